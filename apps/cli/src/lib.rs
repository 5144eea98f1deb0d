//! Deepspace terminal client — streams a turn from the daemon, reconciles
//! it into a transcript, and keeps per-session history on disk.

pub mod client;
pub mod repl;

pub use client::DaemonClient;
pub use repl::Repl;

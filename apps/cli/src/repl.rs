//! Interactive chat REPL with streaming output and persistent sessions.

use crate::DaemonClient;
use anyhow::Result;
use dcore::{Message, StreamEvent, ToolStatus, Transcript};
use futures_util::StreamExt;
use history::{SessionStore, Store, display_date};
use rustyline::error::ReadlineError;
use std::io::Write;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a fresh session.
    New,
    /// List saved sessions.
    History,
    /// Resume a session by id.
    Open(String),
    /// Delete a session (the active one when no id is given).
    Delete(Option<String>),
    /// Show the command list.
    Help,
    /// Leave the REPL.
    Quit,
    /// Anything unrecognized.
    Unknown(String),
}

impl Command {
    /// Parse the text after the leading `/`.
    pub fn parse(input: &str) -> Self {
        let (name, arg) = match input.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (input, ""),
        };

        match name {
            "new" => Self::New,
            "history" => Self::History,
            "open" if !arg.is_empty() => Self::Open(arg.to_owned()),
            "delete" => Self::Delete((!arg.is_empty()).then(|| arg.to_owned())),
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Interactive chat REPL over a daemon connection.
pub struct Repl<S: Store> {
    client: DaemonClient,
    sessions: SessionStore<S>,
    transcript: Transcript,
    editor: rustyline::DefaultEditor,
}

impl<S: Store> Repl<S> {
    /// Create a REPL resuming the store's active session.
    pub fn new(client: DaemonClient, sessions: SessionStore<S>) -> Result<Self> {
        let transcript = Transcript::resume(sessions.current_messages());
        Ok(Self {
            client,
            sessions,
            transcript,
            editor: rustyline::DefaultEditor::new()?,
        })
    }

    /// Run the interactive loop until EOF or `/quit`.
    pub async fn run(&mut self) -> Result<()> {
        println!("Deepspace chat (Ctrl+D to exit, /help for commands)");
        if !self.transcript.messages().is_empty() {
            println!("resumed session {}", self.sessions.current_id());
        }
        println!("---");

        loop {
            match self.editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(&line);

                    if let Some(command) = line.strip_prefix('/') {
                        if !self.handle_command(Command::parse(command))? {
                            break;
                        }
                        continue;
                    }

                    if let Err(e) = self.send(&line).await {
                        eprintln!("error: {e}");
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Apply a slash command. Returns `false` when the REPL should exit.
    fn handle_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::New => {
                self.sessions.new_session();
                self.transcript.clear();
                println!("started a new chat");
            }
            Command::History => self.print_history(),
            Command::Open(id) => match self.sessions.select(&id) {
                Ok(()) => {
                    self.transcript = Transcript::resume(self.sessions.current_messages());
                    println!("resumed session {id}");
                }
                Err(e) => eprintln!("{e}"),
            },
            Command::Delete(id) => {
                let id = id.unwrap_or_else(|| self.sessions.current_id().to_owned());
                let was_active = id == self.sessions.current_id();
                let removed = self.sessions.delete(&id)?;
                if was_active {
                    self.transcript.clear();
                }
                if removed {
                    println!("deleted session {id}");
                } else {
                    println!("no such session: {id}");
                }
            }
            Command::Help => {
                println!("/new              start a fresh chat");
                println!("/history          list saved chats");
                println!("/open <id>        resume a chat");
                println!("/delete [id]      delete a chat (default: current)");
                println!("/quit             exit");
            }
            Command::Quit => return Ok(false),
            Command::Unknown(name) => eprintln!("unknown command: /{name} (try /help)"),
        }
        Ok(true)
    }

    /// Send one user message and stream the turn back into the transcript.
    ///
    /// The session is persisted on every event that changes the message
    /// list, so an interrupted stream still leaves the partial turn saved.
    async fn send(&mut self, line: &str) -> Result<()> {
        self.transcript.push(Message::user(line));
        self.sessions.save(self.transcript.messages())?;

        let messages = self.transcript.messages().to_vec();
        let stream = self.client.chat(&messages);
        futures_util::pin_mut!(stream);

        let mut midline = false;
        loop {
            tokio::select! {
                event = stream.next() => {
                    let event = match event {
                        Some(Ok(event)) => event,
                        Some(Err(e)) => {
                            if midline {
                                println!();
                                midline = false;
                            }
                            eprintln!("stream error: {e}");
                            break;
                        }
                        None => break,
                    };

                    midline = render(&event, midline);
                    if self.transcript.apply(&event) {
                        self.sessions.save(self.transcript.messages())?;
                    }
                    // A status can land before the stream reveals its call;
                    // show it as soon as the invocation is visible.
                    if let StreamEvent::ToolCall { id, .. } = &event {
                        if let Some(status) = self.transcript.status(id) {
                            print_status(status);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }

        if midline {
            println!();
        }
        Ok(())
    }

    fn print_history(&self) {
        if self.sessions.history().is_empty() {
            println!("no saved chats");
            return;
        }

        for (date, sessions) in self.sessions.history().iter().rev() {
            println!("{}", display_date(date));
            for session in sessions {
                let marker = if session.id == self.sessions.current_id() {
                    '*'
                } else {
                    ' '
                };
                println!("  {marker} {}  {}", session.id, session.title);
            }
        }
    }
}

/// Print one event. Returns whether the cursor is mid-line afterwards.
fn render(event: &StreamEvent, midline: bool) -> bool {
    match event {
        StreamEvent::Text { delta } => {
            print!("{delta}");
            let _ = std::io::stdout().flush();
            true
        }
        StreamEvent::ToolCall { name, args, .. } => {
            if midline {
                println!();
            }
            println!("[{name}] {args}");
            false
        }
        StreamEvent::ToolStatus(status) => {
            if midline {
                println!();
            }
            print_status(status);
            false
        }
        StreamEvent::ToolResult { .. } | StreamEvent::Finish => midline,
        StreamEvent::Error { message } => {
            if midline {
                println!();
            }
            eprintln!("! {message}");
            false
        }
    }
}

fn print_status(status: &ToolStatus) {
    match (&status.error, status.progress) {
        (Some(error), _) => println!("  ! {}: {error}", status.message),
        (None, Some(progress)) => println!("  - {} ({progress}%)", status.message),
        (None, None) => println!("  - {}", status.message),
    }
}

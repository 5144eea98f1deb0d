//! Chat sessions and their derived metadata.

use chrono::{Days, Local, NaiveDate};
use compact_str::CompactString;
use dcore::{Message, Role};
use serde::{Deserialize, Serialize};

/// Title used when a session has no user message yet.
pub const DEFAULT_TITLE: &str = "New chat";

/// Maximum title length in characters before truncation.
const TITLE_MAX_CHARS: usize = 20;

/// One conversation thread, grouped under its creation date.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatSession {
    /// Unique session id
    pub id: CompactString,

    /// Creation date, `YYYY-MM-DD` local time
    pub date: CompactString,

    /// Display title derived from the first user message
    pub title: String,

    /// All messages of the session, in order
    pub messages: Vec<Message>,

    /// Creation time, unix milliseconds
    pub created_at: i64,

    /// Last update time, unix milliseconds
    pub updated_at: i64,
}

/// Derive a session title from its messages.
///
/// The first 20 characters of the first non-empty user message, with an
/// ellipsis appended only when something was cut off.
pub fn session_title(messages: &[Message]) -> String {
    let Some(first) = messages
        .iter()
        .find(|m| m.role == Role::User && !m.content.is_empty())
    else {
        return DEFAULT_TITLE.to_owned();
    };

    let mut title: String = first.content.chars().take(TITLE_MAX_CHARS).collect();
    if first.content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Today's date key, `YYYY-MM-DD` in local time.
pub fn today() -> CompactString {
    CompactString::new(Local::now().format("%Y-%m-%d").to_string())
}

/// Friendly form of a date key: "Today", "Yesterday", or the date itself
/// with its weekday.
pub fn display_date(date: &str) -> String {
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_owned();
    };

    let today = Local::now().date_naive();
    if parsed == today {
        "Today".to_owned()
    } else if Some(parsed) == today.checked_sub_days(Days::new(1)) {
        "Yesterday".to_owned()
    } else {
        parsed.format("%a %m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_title_kept_verbatim() {
        let messages = vec![Message::user("weather in Oslo?")];
        assert_eq!(session_title(&messages), "weather in Oslo?");
    }

    #[test]
    fn long_title_truncates_with_ellipsis() {
        let messages = vec![Message::user("what is the weather like in Oslo today")];
        let title = session_title(&messages);
        assert_eq!(title, "what is the weather ...");
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn exactly_twenty_chars_has_no_ellipsis() {
        let content = "a".repeat(TITLE_MAX_CHARS);
        let messages = vec![Message::user(content.clone())];
        assert_eq!(session_title(&messages), content);
    }

    #[test]
    fn multibyte_titles_truncate_by_character() {
        let messages = vec![Message::user("天".repeat(25))];
        let title = session_title(&messages);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn skips_assistant_messages() {
        let messages = vec![Message::assistant("hello!"), Message::user("hi")];
        assert_eq!(session_title(&messages), "hi");
    }

    #[test]
    fn no_user_message_falls_back() {
        assert_eq!(session_title(&[]), DEFAULT_TITLE);
        assert_eq!(
            session_title(&[Message::assistant("greetings")]),
            DEFAULT_TITLE
        );
    }

    #[test]
    fn display_date_passes_garbage_through() {
        assert_eq!(display_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn display_date_recognizes_today() {
        assert_eq!(display_date(&today()), "Today");
    }
}

//! Inbox messages and search queries.
//!
//! Messages arrive in a mail provider's metadata shape: an id, labels, a
//! snippet, and a list of `{name, value}` headers. Only `From`, `Subject` and
//! `Date` are read, matched case-insensitively. A missing header leaves its
//! field empty.

use crate::error::Result;
use serde::Deserialize;
use std::fmt;

/// Results returned by a query unless it says otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 10;

const UNREAD_LABEL: &str = "UNREAD";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Payload {
    headers: Vec<Header>,
}

/// The wire shape of one message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawMessage {
    id: String,
    thread_id: String,
    label_ids: Vec<String>,
    snippet: String,
    payload: Payload,
}

impl RawMessage {
    /// The last header called `name`, ignoring case.
    fn header(&self, name: &str) -> String {
        self.payload
            .headers
            .iter()
            .rev()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }
}

/// One inbox message, reduced to what an assistant reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMessage")]
pub struct EmailMessage {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
    pub labels: Vec<String>,
}

impl From<RawMessage> for EmailMessage {
    fn from(raw: RawMessage) -> Self {
        Self {
            from: raw.header("From"),
            subject: raw.header("Subject"),
            date: raw.header("Date"),
            id: raw.id,
            thread_id: raw.thread_id,
            snippet: raw.snippet,
            labels: raw.label_ids,
        }
    }
}

impl EmailMessage {
    pub fn is_unread(&self) -> bool {
        self.has_label(UNREAD_LABEL)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessagesDocument {
    List(Vec<EmailMessage>),
    Response { messages: Vec<EmailMessage> },
}

/// Parse messages from JSON: a bare array or `{"messages": [...]}`.
pub fn parse_messages_json(json: &str) -> Result<Vec<EmailMessage>> {
    let document: MessagesDocument = serde_json::from_str(json)?;
    Ok(match document {
        MessagesDocument::List(messages) => messages,
        MessagesDocument::Response { messages } => messages,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Unread,
    From(String),
    Subject(String),
    Label(String),
    Text(String),
}

impl Term {
    fn parse(token: &str) -> Self {
        let lower = token.to_lowercase();
        match lower.split_once(':') {
            Some(("is", "unread")) => Term::Unread,
            Some(("from", value)) if !value.is_empty() => Term::From(value.to_string()),
            Some(("subject", value)) if !value.is_empty() => Term::Subject(value.to_string()),
            Some(("label", value)) if !value.is_empty() => Term::Label(value.to_string()),
            _ => Term::Text(lower),
        }
    }

    fn matches(&self, message: &EmailMessage) -> bool {
        let contains = |field: &str, needle: &str| field.to_lowercase().contains(needle);
        match self {
            Term::Unread => message.is_unread(),
            Term::From(who) => contains(&message.from, who),
            Term::Subject(text) => contains(&message.subject, text),
            Term::Label(label) => message.has_label(label),
            Term::Text(text) => {
                contains(&message.from, text)
                    || contains(&message.subject, text)
                    || contains(&message.snippet, text)
            }
        }
    }
}

/// A mailbox search in provider query syntax.
///
/// Supports `is:unread`, `from:`, `subject:` and `label:` operators plus bare
/// words matched against sender, subject and snippet. Every term must match.
/// Matching ignores case. Any other `op:value` token is matched as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailQuery {
    raw: String,
    terms: Vec<Term>,
    max_results: usize,
}

impl MailQuery {
    pub fn parse(query: &str) -> Self {
        Self {
            raw: query.trim().to_string(),
            terms: query.split_whitespace().map(Term::parse).collect(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// `is:unread`.
    pub fn unread() -> Self {
        Self::parse("is:unread")
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the query asks for nothing but unread mail.
    pub fn is_unread_only(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(|t| *t == Term::Unread)
    }

    pub fn matches(&self, message: &EmailMessage) -> bool {
        self.terms.iter().all(|t| t.matches(message))
    }
}

impl fmt::Display for MailQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/sheet types here; adapters map their payloads into these.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of themes a post can be about.
pub const TOPICS: [&str; 10] = [
    "Space Exploration",
    "Cybersecurity & Privacy",
    "Web3 & Decentralization",
    "Climate Change Action & Sustainability",
    "Pop Culture & Entertainment",
    "Memes & Internet Culture",
    "Global News & Geopolitics",
    "Elon Musk",
    "Donald Trump",
    "Vladimir Putin",
];

/// Closed set of personas the model writes as.
pub const VOICES: [&str; 26] = [
    "The Sarcastic Cynic",
    "The Optimistic Enthusiast",
    "The Curious Observer",
    "The Skeptical Researcher",
    "The Passionate Advocate",
    "The Relatable Friend",
    "The Techie Guru",
    "The Creative Innovator",
    "The World Traveler",
    "The Foodie Expert",
    "The Empathetic Listener",
    "The Nostalgic Storyteller",
    "The Ambitious Hustler",
    "The Laid-back Observer",
    "A Software Developer",
    "A Marketing Strategist",
    "A Financial Advisor",
    "A Personal Trainer",
    "A Teacher/Educator",
    "A Journalist/Reporter",
    "A Data Scientist",
    "A Designer",
    "The Conspiracy Theorist (lighthearted)",
    "The Internet Meme Expert",
    "The \"Karen\" (Satirically)",
    "The Confused Millennial/Gen Z",
];

/// A theme drawn from [`TOPICS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic(&'static str);

impl Topic {
    /// Looks up a topic by its exact label.
    pub fn parse(label: &str) -> Option<Self> {
        TOPICS.into_iter().find(|t| *t == label).map(Self)
    }

    /// Topic at position `index` of [`TOPICS`], wrapping around.
    pub fn from_index(index: usize) -> Self {
        Self(TOPICS[index % TOPICS.len()])
    }

    pub fn all() -> impl Iterator<Item = Topic> {
        TOPICS.into_iter().map(Self)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A persona drawn from [`VOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voice(&'static str);

impl Voice {
    pub fn parse(label: &str) -> Option<Self> {
        VOICES.into_iter().find(|v| *v == label).map(Self)
    }

    pub fn from_index(index: usize) -> Self {
        Self(VOICES[index % VOICES.len()])
    }

    pub fn all() -> impl Iterator<Item = Voice> {
        VOICES.into_iter().map(Self)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One news result from the search collaborator. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub body: String,
    pub source: String,
    pub url: String,
    pub date: String,
}

impl NewsItem {
    /// Renders the item the way it is embedded in the drafting prompt.
    pub fn render(&self) -> String {
        let mut out = self.title.trim().to_string();
        if !self.body.trim().is_empty() {
            out.push_str(" - ");
            out.push_str(self.body.trim());
        }
        if !self.source.trim().is_empty() {
            out.push_str(&format!(" (source: {})", self.source.trim()));
        }
        out
    }
}

/// Prompt text for a (possibly empty) list of news results. Empty renders as `None`.
pub fn render_news(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .map(NewsItem::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Unvalidated generated post text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft(String);

impl Draft {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Length in Unicode scalar values (what the length policy counts).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_text(self) -> String {
        self.0
    }
}

/// Binary review judgment on a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    /// Interprets raw reviewer output. Only an exact (trimmed, case-insensitive)
    /// `rejected` rejects; every other response, malformed ones included, approves.
    pub fn from_review(raw: &str) -> Self {
        if raw.trim().to_lowercase() == "rejected" {
            Verdict::Rejected
        } else {
            Verdict::Approved
        }
    }
}

/// Publishing target. `X` is platform A (status-checked), `Bluesky` is platform B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    Bluesky,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::X, Platform::Bluesky];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::X => "x",
            Platform::Bluesky => "bluesky",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which audit log an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Posted,
    Long,
    Error,
    Rejected,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Posted,
        LogCategory::Long,
        LogCategory::Error,
        LogCategory::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Posted => "posted",
            LogCategory::Long => "long",
            LogCategory::Error => "error",
            LogCategory::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit timestamp format (`DD-MM-YYYY HH:MM:SS`).
pub const AUDIT_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One append-only audit row: (timestamp, message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub message: String,
}

impl AuditEntry {
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>, message: impl Into<String>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            timestamp: time.format(AUDIT_TIME_FORMAT).to_string(),
            message: message.into(),
        }
    }
}

/// What a platform returned for a publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    /// HTTP status code of the create call.
    pub status: u16,
    /// Platform identifier of the created post, when the response carried one.
    pub id: Option<String>,
}

/// Terminal classification of a single pipeline attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Rejected,
    TooLong { chars: usize },
    PlatformError { status: u16 },
    /// X could not be reached after Bluesky already took the post.
    PlatformFailed { message: String },
    Failed { kind: &'static str, message: String },
    Success { text: String },
}

/// Result of a whole publication run. Never an error: exhaustion is reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationOutcome {
    /// `failed_attempts` is the attempt counter when the post went out.
    Published { failed_attempts: u32, text: String },
    /// X answered with a non-201 status; the loop stopped without retrying.
    PlatformRejected { status: u16, attempts: u32 },
    /// X failed outright after Bluesky accepted; the loop stopped without retrying.
    PlatformFailed { message: String, attempts: u32 },
    GaveUp { attempts: u32 },
}

impl PublicationOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublicationOutcome::Published { .. })
    }
}

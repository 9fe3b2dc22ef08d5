//! Stepbook Core Library
//!
//! Provides the practice record model, reporting-range resolution,
//! aggregation analytics, storage, and export functionality for the
//! Stepbook dance practice journal.

pub mod analytics;
pub mod coach;
pub mod export;
pub mod range;
pub mod store;

pub use analytics::{aggregate, AnalysisReport, CategoryCount, SummaryStats, TrendBucket};
pub use coach::Coach;
pub use export::{ExportFormat, Exporter};
pub use range::{RangeSelector, ReportingWindow};
pub use store::JournalStore;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Studio label applied when none is given at creation.
pub const UNKNOWN_STUDIO: &str = "Unknown Studio";

/// Instructor label applied when none is given at creation.
pub const SELF_TAUGHT: &str = "Self";

/// Class difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Open,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Open => "Open",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "open" => Some(Difficulty::Open),
            _ => None,
        }
    }
}

/// Mood tag recorded after a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Energized,
    Relaxed,
    Tired,
    Frustrated,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Energized => "Energized",
            Mood::Relaxed => "Relaxed",
            Mood::Tired => "Tired",
            Mood::Frustrated => "Frustrated",
        }
    }

    /// Emoji used by the calendar and detail views
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Energized => "🤩",
            Mood::Relaxed => "😌",
            Mood::Tired => "😤",
            Mood::Frustrated => "😕",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Some(Mood::Happy),
            "energized" => Some(Mood::Energized),
            "relaxed" => Some(Mood::Relaxed),
            "tired" => Some(Mood::Tired),
            "frustrated" => Some(Mood::Frustrated),
            _ => None,
        }
    }
}

/// Kind of attached media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// Reference to a photo or video attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub kind: MediaKind,
}

/// A single logged practice session
///
/// Immutable once created; edits replace the record by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeRecord {
    pub id: Uuid,
    /// Local date and time of the session; the authoritative instant
    /// for all filtering and bucketing.
    pub occurred_at: NaiveDateTime,
    pub style: String,
    pub duration_minutes: u32,
    pub studio: String,
    pub instructor: String,
    pub difficulty: Difficulty,
    pub mood: Mood,
    pub notes: String,
    pub music_title: String,
    pub media: Option<MediaRef>,
}

impl PracticeRecord {
    pub fn new(occurred_at: NaiveDateTime, style: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            style: style.into(),
            duration_minutes,
            studio: UNKNOWN_STUDIO.to_string(),
            instructor: SELF_TAUGHT.to_string(),
            difficulty: Difficulty::Open,
            mood: Mood::Happy,
            notes: String::new(),
            music_title: String::new(),
            media: None,
        }
    }

    pub fn with_studio(mut self, studio: impl Into<String>) -> Self {
        self.studio = studio.into();
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_music(mut self, title: impl Into<String>) -> Self {
        self.music_title = title.into();
        self
    }

    pub fn with_media(mut self, url: impl Into<String>, kind: MediaKind) -> Self {
        self.media = Some(MediaRef { url: url.into(), kind });
        self
    }
}

/// Get the data directory for Stepbook
pub fn data_dir() -> std::path::PathBuf {
    directories::ProjectDirs::from("com", "stepbook", "stepbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            directories::BaseDirs::new()
                .map(|d| d.home_dir().join(".stepbook"))
                .unwrap_or_else(|| std::path::PathBuf::from(".stepbook"))
        })
}

/// Get the journal database file path
pub fn journal_path() -> std::path::PathBuf {
    data_dir().join("stepbook.db")
}

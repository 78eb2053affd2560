use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type PackName = String;

/// Name of the immutable pack compiled into the binary
pub const BUILTIN_PACK_NAME: &str = "default";

/// Countdown bounds for Classic mode, in seconds
pub const MIN_TIMER_SECS: u32 = 30;
pub const MAX_TIMER_SECS: u32 = 300;
pub const DEFAULT_TIMER_SECS: u32 = 120;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Intro,
    Home,
    Play,
    Creator,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    None,
    Classic,
    YesAnd,
    Constraint,
    Mashup,
}

impl Mode {
    /// Modes where the human and the AI compete for points
    pub fn is_scored(&self) -> bool {
        matches!(self, Mode::Classic | Mode::Constraint | Mode::Mashup)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Classic => "Classic",
            Mode::YesAnd => "Yes, And...",
            Mode::Constraint => "Constraint",
            Mode::Mashup => "Mash-up",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// How much the player is asked to write at this difficulty
    pub fn guidance(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy: 2-3 sentences, around 60 words.",
            Difficulty::Medium => "Medium: 3-5 sentences, around 120 words.",
            Difficulty::Hard => "Hard: 5-7 sentences, around 180 words.",
        }
    }
}

/// One side of a head-to-head round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Human,
    #[serde(rename = "AI")]
    Ai,
}

/// Running win tally, serialized as `{"Human": n, "AI": m}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    #[serde(rename = "Human")]
    pub human: u32,
    #[serde(rename = "AI")]
    pub ai: u32,
}

/// Advisory judgment from the remote model; never feeds the scoreboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub winner: Option<Side>,
    pub reason: String,
    pub raw: String,
}

/// Everything one player's game needs, owned by a single connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub page: Page,
    pub mode: Mode,
    pub round: u32,
    pub difficulty: Difficulty,
    pub timer_total_secs: u32,
    pub timer_end: Option<DateTime<Utc>>,
    pub prompt: Option<String>,
    pub user_response: String,
    pub ai_response: Option<String>,
    /// Yes-And transcript, only ever appended to within a story
    pub story: String,
    pub theme: PackName,
    pub use_ai_judge: bool,
    pub double_challenge: bool,
    pub verdict: Option<Verdict>,
    pub score: Score,
}

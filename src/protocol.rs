use crate::state::SessionSnapshot;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Named actions the rendering layer dispatches into a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Re-read the session (also serves as the periodic refresh)
    Refresh,
    Navigate {
        page: Page,
    },
    StartMode {
        mode: Mode,
    },
    // Sidebar settings
    SetDifficulty {
        difficulty: Difficulty,
    },
    SetTimer {
        seconds: u32,
    },
    SelectPack {
        name: PackName,
    },
    SetAiJudge {
        enabled: bool,
    },
    SetDoubleChallenge {
        enabled: bool,
    },
    // Play screen
    GeneratePrompt,
    UpdateResponse {
        text: String,
    },
    RevealAi,
    Vote {
        side: Side,
    },
    ResetScore,
    RequestVerdict,
    StartStory,
    AddStoryLine {
        text: String,
    },
    // Pack creator
    ListPacks,
    SavePack {
        name: String,
        prompts: Vec<String>,
        concepts: Vec<String>,
        constraints: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        ai_available: bool,
        packs: Vec<PackName>,
        state: SessionSnapshot,
    },
    /// Full session after an action was applied
    State {
        state: SessionSnapshot,
    },
    /// Countdown tick while a Classic timer is armed
    Timer {
        remaining_secs: u64,
        expired: bool,
        server_now: String,
    },
    Packs {
        packs: Vec<PackName>,
    },
    PackSaved {
        name: PackName,
        packs: Vec<PackName>,
        state: SessionSnapshot,
    },
    PackInvalid {
        violations: Vec<String>,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn error(err: &crate::error::GameError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_str(r#"{"t":"vote","side":"AI"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Vote { side: Side::Ai }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"start_mode","mode":"yes_and"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::StartMode { mode: Mode::YesAnd }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"set_difficulty","difficulty":"Hard"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::SetDifficulty {
                difficulty: Difficulty::Hard
            }
        ));
    }

    #[test]
    fn test_error_message_shape() {
        let err = crate::error::GameError::InsufficientConcepts { found: 1 };
        let json = serde_json::to_value(ServerMessage::error(&err)).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "INSUFFICIENT_CONCEPTS");
    }
}

//! WebSocket message dispatch
//!
//! Each message is one action applied to the connection's session. Handlers
//! answer with the new session state or with an error; a failed action never
//! leaves a half-applied session behind.

use crate::error::{GameError, GameResult};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Page, Session};
use chrono::Utc;
use std::sync::Arc;

fn state_message(session: &Session) -> ServerMessage {
    ServerMessage::State {
        state: session.snapshot(Utc::now()),
    }
}

fn respond(session: &Session, result: GameResult<()>) -> Option<ServerMessage> {
    match result {
        Ok(()) => Some(state_message(session)),
        Err(e) => {
            tracing::warn!("Session {} action rejected: {}", session.id, e);
            Some(ServerMessage::error(&e))
        }
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    session: &mut Session,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Refresh => Some(state_message(session)),

        ClientMessage::Navigate { page } => {
            tracing::info!("Session {} navigating to {:?}", session.id, page);
            let result = session.navigate(page);
            respond(session, result)
        }

        ClientMessage::StartMode { mode } => {
            tracing::info!("Session {} starting {} mode", session.id, mode.label());
            let result = session.start_mode(mode);
            respond(session, result)
        }

        ClientMessage::SetDifficulty { difficulty } => {
            session.set_difficulty(difficulty);
            Some(state_message(session))
        }

        ClientMessage::SetTimer { seconds } => {
            session.set_timer_total(seconds);
            Some(state_message(session))
        }

        ClientMessage::SelectPack { name } => handle_select_pack(state, session, name),

        ClientMessage::SetAiJudge { enabled } => {
            session.set_use_ai_judge(enabled);
            Some(state_message(session))
        }

        ClientMessage::SetDoubleChallenge { enabled } => {
            session.set_double_challenge(enabled);
            Some(state_message(session))
        }

        ClientMessage::GeneratePrompt => {
            let result = state.generate_prompt(session);
            respond(session, result)
        }

        ClientMessage::UpdateResponse { text } => {
            session.set_user_response(text);
            Some(state_message(session))
        }

        ClientMessage::RevealAi => {
            tracing::info!("Session {} requesting AI answer", session.id);
            let result = state.reveal_ai_answer(session).await;
            respond(session, result)
        }

        ClientMessage::Vote { side } => {
            tracing::info!("Session {} vote: {:?}", session.id, side);
            let result = session.vote(side);
            respond(session, result)
        }

        ClientMessage::ResetScore => {
            tracing::info!("Session {} resetting scoreboard", session.id);
            let result = session.reset_score();
            respond(session, result)
        }

        ClientMessage::RequestVerdict => {
            let result = state.request_verdict(session).await;
            respond(session, result)
        }

        ClientMessage::StartStory => {
            let result = session.start_story();
            respond(session, result)
        }

        ClientMessage::AddStoryLine { text } => {
            // A blank line is accepted and changes nothing
            let result = state.add_story_line(session, &text).await.map(|_| ());
            respond(session, result)
        }

        ClientMessage::ListPacks => Some(ServerMessage::Packs {
            packs: state.packs.list_packs(),
        }),

        ClientMessage::SavePack {
            name,
            prompts,
            concepts,
            constraints,
        } => handle_save_pack(state, session, name, prompts, concepts, constraints),
    }
}

fn handle_select_pack(
    state: &Arc<AppState>,
    session: &mut Session,
    name: String,
) -> Option<ServerMessage> {
    if !state.packs.list_packs().contains(&name) {
        return Some(ServerMessage::error(&GameError::InvalidAction(format!(
            "Unknown pack '{}'",
            name
        ))));
    }
    tracing::info!("Session {} selected pack '{}'", session.id, name);
    session.set_theme(name);
    Some(state_message(session))
}

/// Save a pack from the creator, select it, and return to the mode picker
fn handle_save_pack(
    state: &Arc<AppState>,
    session: &mut Session,
    name: String,
    prompts: Vec<String>,
    concepts: Vec<String>,
    constraints: Vec<String>,
) -> Option<ServerMessage> {
    match state.packs.save_pack(&name, prompts, concepts, constraints) {
        Ok(saved) => {
            session.set_theme(saved.clone());
            if let Err(e) = session.navigate(Page::Home) {
                return Some(ServerMessage::error(&e));
            }
            Some(ServerMessage::PackSaved {
                name: saved,
                packs: state.packs.list_packs(),
                state: session.snapshot(Utc::now()),
            })
        }
        Err(GameError::PackValidation(violations)) => {
            tracing::info!(
                "Session {} pack rejected with {} problem(s)",
                session.id,
                violations.len()
            );
            Some(ServerMessage::PackInvalid { violations })
        }
        Err(e) => {
            tracing::error!("Failed to save pack '{}': {}", name, e);
            Some(ServerMessage::error(&e))
        }
    }
}

use super::AppState;
use crate::error::{GameError, GameResult};
use crate::llm::{self, LlmProvider};
use crate::types::*;

impl AppState {
    fn provider(&self) -> GameResult<&dyn LlmProvider> {
        self.llm.as_deref().ok_or(GameError::LlmUnavailable)
    }

    /// Draw a new challenge from the session's selected pack
    pub fn generate_prompt(&self, session: &mut Session) -> GameResult<()> {
        let pack = self.packs.load_pack(&session.theme);
        session.generate(&pack, &mut rand::rng(), chrono::Utc::now())?;
        tracing::info!(
            "Session {} round {} ({}): {}",
            session.id,
            session.round,
            session.mode.label(),
            session.prompt.as_deref().unwrap_or_default()
        );
        Ok(())
    }

    /// Ask the model for its competing answer.
    ///
    /// Calling again replaces the previous answer. On failure the session is
    /// left as it was.
    pub async fn reveal_ai_answer(&self, session: &mut Session) -> GameResult<()> {
        let challenge = session.challenge_for_ai()?;
        let provider = self.provider()?;

        let text = llm::generate_answer(
            provider,
            &challenge,
            session.difficulty,
            session.mode,
            self.llm_timeout,
        )
        .await
        .map_err(|e| {
            tracing::error!("AI answer failed for session {}: {}", session.id, e);
            GameError::from(e)
        })?;

        session.set_ai_response(text)
    }

    /// Yes-And turn: the human line plus the model's continuation.
    ///
    /// Returns `Ok(false)` without touching anything when the line is blank.
    /// Neither line is appended unless the model answers.
    pub async fn add_story_line(&self, session: &mut Session, line: &str) -> GameResult<bool> {
        session.require_story_mode()?;
        if line.trim().is_empty() {
            tracing::debug!("Ignoring blank story line for session {}", session.id);
            return Ok(false);
        }
        let provider = self.provider()?;

        let story = session.story_with(line);
        let continuation =
            llm::continue_story(provider, &story, session.difficulty, self.llm_timeout)
                .await
                .map_err(|e| {
                    tracing::error!("Story continuation failed for session {}: {}", session.id, e);
                    GameError::from(e)
                })?;

        session.append_story_turn(line, &continuation);
        Ok(true)
    }

    /// Advisory verdict. Never changes the score.
    pub async fn request_verdict(&self, session: &mut Session) -> GameResult<()> {
        let (prompt, human, ai) = session.verdict_inputs()?;
        let provider = self.provider()?;

        let verdict = llm::judge_verdict(
            provider,
            &prompt,
            &human,
            &ai,
            self.verdict_model.as_deref(),
            self.llm_timeout,
        )
        .await
        .map_err(|e| {
            tracing::error!("Verdict failed for session {}: {}", session.id, e);
            GameError::from(e)
        })?;

        tracing::info!(
            "Session {} verdict: {:?} ({})",
            session.id,
            verdict.winner,
            verdict.reason
        );
        session.set_verdict(verdict);
        Ok(())
    }
}

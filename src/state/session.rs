//! The per-player session state machine.
//!
//! Every transition takes `&mut self` and either applies completely or returns
//! an error with the session untouched. Time and randomness come in as
//! arguments so transitions are deterministic under test.

use crate::error::{GameError, GameResult};
use crate::pack::ContentPack;
use crate::prompt;
use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;

impl Session {
    pub fn new() -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            page: Page::Intro,
            mode: Mode::None,
            round: 0,
            difficulty: Difficulty::default(),
            timer_total_secs: DEFAULT_TIMER_SECS,
            timer_end: None,
            prompt: None,
            user_response: String::new(),
            ai_response: None,
            story: String::new(),
            theme: BUILTIN_PACK_NAME.to_string(),
            use_ai_judge: false,
            double_challenge: false,
            verdict: None,
            score: Score::default(),
        }
    }

    /// Drop everything tied to the current challenge. Round and score stay.
    fn clear_round(&mut self) {
        self.prompt = None;
        self.user_response.clear();
        self.ai_response = None;
        self.verdict = None;
        self.timer_end = None;
    }

    fn require_play(&self, action: &str) -> GameResult<()> {
        if self.page != Page::Play {
            return Err(GameError::InvalidAction(format!(
                "Cannot {} outside of a game",
                action
            )));
        }
        Ok(())
    }

    fn require_scored_mode(&self, action: &str) -> GameResult<()> {
        self.require_play(action)?;
        if !self.mode.is_scored() {
            return Err(GameError::InvalidAction(format!(
                "Cannot {} in {} mode",
                action,
                self.mode.label()
            )));
        }
        Ok(())
    }

    /// Move between top-level screens. `Play` is entered via `start_mode`.
    pub fn navigate(&mut self, page: Page) -> GameResult<()> {
        match page {
            Page::Intro | Page::Home => {
                self.clear_round();
                self.page = page;
            }
            Page::Creator => self.page = Page::Creator,
            Page::Play => {
                return Err(GameError::InvalidAction(
                    "Pick a mode to start playing".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn start_mode(&mut self, mode: Mode) -> GameResult<()> {
        if mode == Mode::None {
            return Err(GameError::InvalidAction("No mode selected".to_string()));
        }
        self.clear_round();
        self.page = Page::Play;
        self.mode = mode;
        Ok(())
    }

    /// Draw a fresh challenge for Classic, Constraint, or Mash-up.
    ///
    /// The prompt is computed before anything is touched, so a pack that
    /// cannot produce one leaves the session exactly as it was.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        pack: &ContentPack,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> GameResult<()> {
        self.require_play("generate a prompt")?;
        let prompt = match self.mode {
            Mode::Classic => prompt::generate_classic(pack, rng)?,
            Mode::Mashup => prompt::generate_mashup(pack, rng)?,
            Mode::Constraint => prompt::generate_constraint(pack, self.double_challenge, rng)?,
            Mode::YesAnd | Mode::None => {
                return Err(GameError::InvalidAction(format!(
                    "Cannot generate a prompt in {} mode",
                    self.mode.label()
                )));
            }
        };

        self.clear_round();
        self.prompt = Some(prompt);
        self.round += 1;
        if self.mode == Mode::Classic {
            self.timer_end = Some(now + Duration::seconds(i64::from(self.timer_total_secs)));
        }
        Ok(())
    }

    /// Yes-And: wipe the transcript and count a new round
    pub fn start_story(&mut self) -> GameResult<()> {
        self.require_story_mode()?;
        self.story.clear();
        self.round += 1;
        Ok(())
    }

    /// The challenge the AI should answer next
    pub fn challenge_for_ai(&self) -> GameResult<String> {
        self.require_scored_mode("reveal the AI answer")?;
        self.prompt.clone().ok_or_else(|| {
            GameError::InvalidAction("Generate a prompt before asking the AI".to_string())
        })
    }

    /// Store the AI's answer, replacing any earlier one for this prompt
    pub fn set_ai_response(&mut self, text: String) -> GameResult<()> {
        self.challenge_for_ai()?;
        self.ai_response = Some(text);
        self.verdict = None;
        Ok(())
    }

    pub fn require_story_mode(&self) -> GameResult<()> {
        self.require_play("add to the story")?;
        if self.mode != Mode::YesAnd {
            return Err(GameError::InvalidAction(format!(
                "Stories belong to {} mode",
                Mode::YesAnd.label()
            )));
        }
        Ok(())
    }

    /// Transcript as it would read with `human` appended
    pub fn story_with(&self, human: &str) -> String {
        let line = format!("You: {}", human.trim());
        if self.story.is_empty() {
            line
        } else {
            format!("{}\n{}", self.story, line)
        }
    }

    pub fn append_story_turn(&mut self, human: &str, ai: &str) {
        for line in [format!("You: {}", human.trim()), format!("AI: {}", ai.trim())] {
            if !self.story.is_empty() {
                self.story.push('\n');
            }
            self.story.push_str(&line);
        }
    }

    /// Record a win. Repeated votes in the same round all count.
    pub fn vote(&mut self, side: Side) -> GameResult<()> {
        self.require_scored_mode("vote")?;
        self.score.increment(side);
        Ok(())
    }

    pub fn reset_score(&mut self) -> GameResult<()> {
        self.require_play("reset the scoreboard")?;
        self.score.reset();
        Ok(())
    }

    /// Prompt, human answer and AI answer, once a verdict can be asked for
    pub fn verdict_inputs(&self) -> GameResult<(String, String, String)> {
        if !self.use_ai_judge {
            return Err(GameError::InvalidAction(
                "Turn on the AI judge to request a verdict".to_string(),
            ));
        }
        let prompt = self.challenge_for_ai()?;
        let ai = self.ai_response.clone().ok_or_else(|| {
            GameError::InvalidAction("Reveal the AI answer before judging".to_string())
        })?;
        Ok((prompt, self.user_response.clone(), ai))
    }

    pub fn set_verdict(&mut self, verdict: Verdict) {
        self.verdict = Some(verdict);
    }

    /// Whole seconds left on the countdown, rounded up and clamped at zero.
    /// `None` when disarmed.
    pub fn timer_remaining(&self, now: DateTime<Utc>) -> Option<u64> {
        self.timer_end.map(|end| {
            let millis = (end - now).num_milliseconds().max(0) as u64;
            millis.div_ceil(1000)
        })
    }

    /// True once the deadline itself has passed
    pub fn timer_expired(&self, now: DateTime<Utc>) -> bool {
        self.timer_end.is_some_and(|end| now >= end)
    }

    // Sidebar settings

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Takes effect on the next Classic prompt; a running countdown is kept
    pub fn set_timer_total(&mut self, secs: u32) {
        self.timer_total_secs = secs.clamp(MIN_TIMER_SECS, MAX_TIMER_SECS);
    }

    pub fn set_theme(&mut self, theme: PackName) {
        self.theme = theme;
    }

    pub fn set_use_ai_judge(&mut self, enabled: bool) {
        self.use_ai_judge = enabled;
        if !enabled {
            self.verdict = None;
        }
    }

    pub fn set_double_challenge(&mut self, enabled: bool) {
        self.double_challenge = enabled;
    }

    pub fn set_user_response(&mut self, text: String) {
        self.user_response = text;
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let guidance = self
            .prompt
            .as_deref()
            .map(|p| prompt::guidance_for(p, self.difficulty));
        SessionSnapshot {
            session: self.clone(),
            timer_remaining_secs: self.timer_remaining(now),
            timer_expired: self.timer_expired(now),
            guidance,
            leader: self.score.leader(),
            server_now: now.to_rfc3339(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// What the renderer needs to draw the current screen
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session: Session,
    pub timer_remaining_secs: Option<u64>,
    pub timer_expired: bool,
    pub guidance: Option<String>,
    /// Side ahead on the scoreboard, `None` on a tie
    pub leader: Option<Side>,
    pub server_now: String,
}

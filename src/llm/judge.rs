//! Requests the game makes of the model: a competing answer, a story
//! continuation, and an advisory verdict.

use super::{GenerateRequest, LlmProvider, LlmResult};
use crate::types::{Difficulty, Mode, Side, Verdict};
use std::time::Duration;

const ANSWER_TEMPERATURE: f32 = 0.9;
const STORY_TEMPERATURE: f32 = 0.95;
const VERDICT_TEMPERATURE: f32 = 0.3;
const VERDICT_MAX_TOKENS: u32 = 80;

/// Length discipline shared by the human and the AI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerBudget {
    pub sentences: &'static str,
    pub words: u32,
    pub max_tokens: u32,
}

impl AnswerBudget {
    pub fn for_mode(difficulty: Difficulty, mode: Mode) -> Self {
        if mode == Mode::YesAnd {
            // Story turns stay short whatever the difficulty
            return Self {
                sentences: "1-2",
                words: 40,
                max_tokens: 90,
            };
        }
        match difficulty {
            Difficulty::Easy => Self {
                sentences: "2-3",
                words: 60,
                max_tokens: 120,
            },
            Difficulty::Medium => Self {
                sentences: "3-5",
                words: 120,
                max_tokens: 240,
            },
            Difficulty::Hard => Self {
                sentences: "5-7",
                words: 180,
                max_tokens: 360,
            },
        }
    }
}

fn answer_system_prompt(budget: AnswerBudget, mode: Mode) -> String {
    let flavour = match mode {
        Mode::Constraint => " Follow every constraint in the challenge exactly.",
        Mode::Mashup => " Blend both ideas into one coherent concept.",
        _ => "",
    };
    format!(
        "You are competing against a human in a creative writing game. \
         Answer the challenge in {} sentences, about {} words at most, the same limit the human has.{} \
         Return only your final answer as plain prose: no headings, no lists, no title, \
         and no commentary about the task.",
        budget.sentences, budget.words, flavour
    )
}

/// Ask the model for its own answer to the current challenge
pub async fn generate_answer(
    provider: &dyn LlmProvider,
    prompt: &str,
    difficulty: Difficulty,
    mode: Mode,
    timeout: Duration,
) -> LlmResult<String> {
    let budget = AnswerBudget::for_mode(difficulty, mode);
    let request = GenerateRequest {
        system: answer_system_prompt(budget, mode),
        prompt: format!("Challenge: {}", prompt),
        max_tokens: Some(budget.max_tokens),
        temperature: ANSWER_TEMPERATURE,
        timeout,
        model_override: None,
    };

    let response = provider.generate(request).await?;
    tracing::info!(
        "AI answer from {}/{} in {}ms",
        response.metadata.provider,
        response.metadata.model,
        response.metadata.latency_ms
    );
    Ok(response.text)
}

/// Yes-And: continue the transcript by one short beat
pub async fn continue_story(
    provider: &dyn LlmProvider,
    story: &str,
    difficulty: Difficulty,
    timeout: Duration,
) -> LlmResult<String> {
    let budget = AnswerBudget::for_mode(difficulty, Mode::YesAnd);
    let request = GenerateRequest {
        system: format!(
            "You are improvising a story with a human, \"Yes, and...\" style. \
             Accept everything already said and continue the story in {} sentences. \
             Return only the new sentences: no speaker label, no quotes, no commentary.",
            budget.sentences
        ),
        prompt: format!("Story so far:\n{}\n\nContinue it:", story),
        max_tokens: Some(budget.max_tokens),
        temperature: STORY_TEMPERATURE,
        timeout,
        model_override: None,
    };

    Ok(provider.generate(request).await?.text)
}

/// Ask the model which answer is better. Purely advisory.
///
/// `model` picks a different model for judging than for answering.
pub async fn judge_verdict(
    provider: &dyn LlmProvider,
    prompt: &str,
    human: &str,
    ai: &str,
    model: Option<&str>,
    timeout: Duration,
) -> LlmResult<Verdict> {
    let human = if human.trim().is_empty() {
        "(no answer)"
    } else {
        human.trim()
    };
    let request = GenerateRequest {
        system: "You judge a creative writing duel between a Human and an AI. \
                 Reply with exactly two lines and nothing else:\n\
                 Winner: Human or AI\n\
                 Reason: <one sentence>"
            .to_string(),
        prompt: format!(
            "Challenge: {}\n\nHuman answer:\n{}\n\nAI answer:\n{}",
            prompt, human, ai
        ),
        max_tokens: Some(VERDICT_MAX_TOKENS),
        temperature: VERDICT_TEMPERATURE,
        timeout,
        model_override: model.map(str::to_string),
    };

    let response = provider.generate(request).await?;
    Ok(parse_verdict(&response.text))
}

/// Read the `Winner:`/`Reason:` lines. Anything unparseable keeps the raw text.
pub fn parse_verdict(raw: &str) -> Verdict {
    let mut winner = None;
    let mut reason = String::new();

    for line in raw.lines() {
        let line = line.trim().trim_start_matches(['*', '-', ' ']);
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches('*').trim();
        match key.trim().trim_matches('*').to_ascii_lowercase().as_str() {
            "winner" => {
                winner = match value.to_ascii_lowercase().as_str() {
                    "human" => Some(Side::Human),
                    "ai" => Some(Side::Ai),
                    _ => None,
                };
            }
            "reason" => reason = value.to_string(),
            _ => {}
        }
    }

    Verdict {
        winner,
        reason,
        raw: raw.trim().to_string(),
    }
}

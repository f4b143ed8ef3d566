//! Multi-turn probe: one scripted conversation replayed under each mode.
//!
//! Unlike a blinded run, the transcript is labelled by mode; it is meant for
//! reading a single exchange side by side, not for scoring.

use crate::caller::{utc_now, Caller};
use crate::errors::RunError;
use crate::instructions::Instructions;
use crate::model::Mode;
use crate::providers::ChatMessage;
use crate::recorder::write_json;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationScript {
    pub name: String,
    pub turns: Vec<ConversationTurn>,
}

/// One assistant reply, keyed by the user turn it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn: String,
    pub content: String,
    pub latency_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTranscript {
    pub test: String,
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub timestamp: String,
    pub turns: Vec<ConversationTurn>,
    pub continuous: Vec<TurnResult>,
    pub diastolic: Vec<TurnResult>,
}

pub fn load_script(path: &Path) -> Result<ConversationScript, RunError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
    let origin = path.display().to_string();
    let script: ConversationScript =
        serde_json::from_str(&raw).map_err(|e| RunError::input_parse(&origin, e.to_string()))?;

    if script.turns.is_empty() {
        return Err(RunError::input_parse(origin, "script has no turns"));
    }
    let mut seen = HashSet::new();
    for turn in &script.turns {
        if turn.content.trim().is_empty() {
            return Err(RunError::input_parse(
                origin,
                format!("turn {} has empty content", turn.id),
            ));
        }
        if !seen.insert(turn.id.as_str()) {
            return Err(RunError::input_parse(
                origin,
                format!("duplicate turn id {}", turn.id),
            ));
        }
    }
    Ok(script)
}

/// Replay `script` under continuous, pause, then under diastolic.
///
/// Each reply joins the history before the next user turn is sent. Any failed
/// call ends the probe.
pub async fn run_conversation(
    caller: &Caller,
    script: &ConversationScript,
    instructions: &Instructions,
    pause: Duration,
) -> Result<ConversationTranscript, RunError> {
    let continuous = replay(caller, script, Mode::Continuous, instructions).await?;
    if !pause.is_zero() {
        tokio::time::sleep(pause).await;
    }
    let diastolic = replay(caller, script, Mode::Diastolic, instructions).await?;

    Ok(ConversationTranscript {
        test: script.name.clone(),
        provider: caller.provider_name().to_string(),
        model: caller.model().to_string(),
        temperature: caller.temperature(),
        timestamp: utc_now(),
        turns: script.turns.clone(),
        continuous,
        diastolic,
    })
}

async fn replay(
    caller: &Caller,
    script: &ConversationScript,
    mode: Mode,
    instructions: &Instructions,
) -> Result<Vec<TurnResult>, RunError> {
    let mut history: Vec<ChatMessage> = Vec::with_capacity(script.turns.len() * 2);
    let mut results = Vec::with_capacity(script.turns.len());

    for turn in &script.turns {
        history.push(ChatMessage::user(turn.content.clone()));
        let (resp, latency_s) = caller
            .complete(&turn.id, mode, instructions.for_mode(mode), &history)
            .await
            .map_err(|f| RunError::from_provider(&f.error, &format!("{} ({})", turn.id, mode)))?;

        info!(turn = %turn.id, %mode, latency_s, "conversation turn");
        history.push(ChatMessage::assistant(resp.text.clone()));
        results.push(TurnResult {
            turn: turn.id.clone(),
            content: resp.text,
            latency_s,
        });
    }
    Ok(results)
}

pub fn write_transcript(path: &Path, transcript: &ConversationTranscript) -> Result<(), RunError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| RunError::write(parent.display().to_string(), e.to_string()))?;
    }
    write_json(path, transcript)
}

//! Applying the key to a comparison document, and checking a finished run.

use super::key::{read_key, KeyFile};
use super::markdown::{self, blinded_text};
use super::{COMPARISON_FILE, KEY_FILE};
use crate::blinding;
use crate::errors::RunError;
use crate::model::{LogEntry, Mode, Prompt, Slot};
use crate::recorder::{read_log, LOG_FILE};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// (prompt id, mode) -> text as it appears in the comparison.
pub fn unblind(doc: &str, key: &KeyFile) -> Result<BTreeMap<(String, Mode), String>, RunError> {
    let parsed = markdown::parse(doc, key)?;
    let mut out = BTreeMap::new();
    for (entry, pair) in parsed.into_iter().zip(&key.pairs) {
        let assignment = pair.assignment();
        out.insert(
            (entry.prompt_id.clone(), assignment.mode_for(Slot::A)),
            entry.a_text,
        );
        out.insert((entry.prompt_id, assignment.mode_for(Slot::B)), entry.b_text);
    }
    Ok(out)
}

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub prompts: usize,
    pub problems: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Re-check a run directory: no mode labels in the comparison, a complete log,
/// a key that matches the blinding, and a comparison the key maps back onto the
/// recorded texts. With `prompts`, the logged ids must also match the prompt set.
///
/// Missing or unreadable files are errors; everything else is collected as a problem.
pub fn verify_run(out_dir: &Path, prompts: Option<&[Prompt]>) -> Result<VerifyReport, RunError> {
    let doc_path = out_dir.join(COMPARISON_FILE);
    let doc = std::fs::read_to_string(&doc_path).map_err(|e| RunError::from_read(&doc_path, &e))?;
    let key = read_key(&out_dir.join(KEY_FILE))?;
    let log = read_log(&out_dir.join(LOG_FILE))?;

    let mut problems = Vec::new();

    if markdown::contains_mode_label(&doc) {
        problems.push(format!("{COMPARISON_FILE} contains a mode label"));
    }

    let (log_ids, by_key) = check_log(&log, &mut problems);

    if let Some(prompts) = prompts {
        let expected: BTreeSet<&str> = prompts.iter().map(|p| p.id.as_str()).collect();
        let logged: BTreeSet<&str> = log_ids.iter().copied().collect();
        for id in expected.difference(&logged) {
            problems.push(format!("prompt {id} has no records"));
        }
        for id in logged.difference(&expected) {
            problems.push(format!("log has records for unknown prompt {id}"));
        }
    }

    let key_ids: Vec<&str> = key.pairs.iter().map(|p| p.prompt_id.as_str()).collect();
    if key_ids != log_ids {
        problems.push(format!(
            "{KEY_FILE} prompts {:?} do not match logged prompts {:?}",
            key_ids, log_ids
        ));
    }

    for pair in &key.pairs {
        let expected = blinding::assign(&pair.prompt_id, key.meta.seed);
        if (pair.a, pair.b) != (expected.a, expected.b) {
            problems.push(format!(
                "prompt {}: key maps A={} B={}, seed {} gives A={} B={}",
                pair.prompt_id, pair.a, pair.b, key.meta.seed, expected.a, expected.b
            ));
        }
    }

    match unblind(&doc, &key) {
        Ok(recovered) => {
            for ((id, mode), text) in &recovered {
                match by_key.get(&(id.as_str(), *mode)) {
                    Some(rec) if blinded_text(&rec.output_text) == *text => {}
                    Some(_) => problems.push(format!(
                        "prompt {id}: {mode} text in {COMPARISON_FILE} differs from the log"
                    )),
                    None => problems.push(format!("prompt {id}: no {mode} record to compare")),
                }
            }
        }
        Err(e) => problems.push(e.message),
    }

    debug!(problems = problems.len(), "verification finished");
    Ok(VerifyReport {
        prompts: key.pairs.len(),
        problems,
    })
}

/// Every logged prompt id exactly once per mode. Returns ids in first-appearance
/// order and the records keyed by (id, mode).
fn check_log<'a>(
    log: &'a [LogEntry],
    problems: &mut Vec<String>,
) -> (Vec<&'a str>, HashMap<(&'a str, Mode), &'a LogEntry>) {
    let mut ids: Vec<&str> = Vec::new();
    let mut counts: HashMap<(&str, Mode), usize> = HashMap::new();
    let mut by_key = HashMap::new();

    for rec in log {
        let id = rec.prompt_id.as_str();
        if !ids.contains(&id) {
            ids.push(id);
        }
        *counts.entry((id, rec.mode)).or_default() += 1;
        by_key.entry((id, rec.mode)).or_insert(rec);
    }

    for id in &ids {
        for mode in Mode::ALL {
            match counts.get(&(*id, mode)).copied().unwrap_or(0) {
                1 => {}
                0 => problems.push(format!("prompt {id} has no {mode} record in {LOG_FILE}")),
                n => problems.push(format!("prompt {id} has {n} {mode} records in {LOG_FILE}")),
            }
        }
    }
    (ids, by_key)
}

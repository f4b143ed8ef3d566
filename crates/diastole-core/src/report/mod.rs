pub mod console;
pub mod key;
pub mod markdown;
pub mod unblind;

use crate::blinding;
use crate::errors::RunError;
use crate::model::{Category, LogEntry, Mode};
use crate::recorder::write_json;
use key::{KeyFile, KeyMeta, KeyPair};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const COMPARISON_FILE: &str = "comparison.md";
pub const KEY_FILE: &str = "key.json";

/// Run settings shown in the comparison header and stored in the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub seed: u64,
}

impl ReportMeta {
    /// Settings taken from the first record of a recorded run.
    pub fn from_log(entries: &[LogEntry], seed: u64) -> Result<Self, RunError> {
        let first = entries
            .first()
            .ok_or_else(|| RunError::incomplete_run("no records in log"))?;
        Ok(Self {
            provider: first.provider.clone(),
            model: first.model.clone(),
            temperature: first.temperature,
            seed,
        })
    }
}

/// One blinded row: the two responses, no mode labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonEntry {
    pub prompt_id: String,
    pub category: Category,
    pub prompt: String,
    pub a_text: String,
    pub b_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub meta: ReportMeta,
    pub entries: Vec<ComparisonEntry>,
    pub key: KeyFile,
}

#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub comparison_path: PathBuf,
    pub key_path: PathBuf,
}

/// Pair up the records of a finished run and blind them.
///
/// Every prompt id must have exactly one record per mode; a partial or
/// duplicated run is rejected rather than reported. Entries follow the order in
/// which prompt ids first appear in `records`.
pub fn build_report(records: &[LogEntry], meta: &ReportMeta) -> Result<Report, RunError> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_key: HashMap<(&str, Mode), &LogEntry> = HashMap::new();

    for rec in records {
        let id = rec.prompt_id.as_str();
        if !order.contains(&id) {
            order.push(id);
        }
        if by_key.insert((id, rec.mode), rec).is_some() {
            return Err(RunError::incomplete_run(format!(
                "duplicate {} record for prompt {}",
                rec.mode, id
            )));
        }
    }
    if order.is_empty() {
        return Err(RunError::incomplete_run("no records to report"));
    }

    let mut entries = Vec::with_capacity(order.len());
    let mut pairs = Vec::with_capacity(order.len());
    for id in order {
        let lookup = |mode: Mode| {
            by_key.get(&(id, mode)).copied().ok_or_else(|| {
                RunError::incomplete_run(format!("prompt {} has no {} record", id, mode))
            })
        };
        let continuous = lookup(Mode::Continuous)?;
        let diastolic = lookup(Mode::Diastolic)?;
        let by_mode = |mode: Mode| match mode {
            Mode::Continuous => continuous,
            Mode::Diastolic => diastolic,
        };

        let assignment = blinding::assign(id, meta.seed);
        entries.push(ComparisonEntry {
            prompt_id: id.to_string(),
            category: continuous.category,
            prompt: continuous.prompt.clone(),
            a_text: by_mode(assignment.a).output_text.clone(),
            b_text: by_mode(assignment.b).output_text.clone(),
        });
        pairs.push(KeyPair {
            prompt_id: id.to_string(),
            category: continuous.category,
            a: assignment.a,
            b: assignment.b,
        });
    }

    Ok(Report {
        meta: meta.clone(),
        entries,
        key: KeyFile {
            meta: KeyMeta::from_report_meta(meta),
            pairs,
        },
    })
}

/// Write `comparison.md` and `key.json` into `out_dir`.
///
/// Refuses to write a comparison that still contains a mode label.
pub fn write_report(out_dir: &Path, report: &Report) -> Result<WrittenReport, RunError> {
    let doc = markdown::render(&report.meta, &report.entries);
    if markdown::contains_mode_label(&doc) {
        return Err(RunError::verify_failed(
            "comparison document would reveal a mode label",
        ));
    }

    let comparison_path = out_dir.join(COMPARISON_FILE);
    std::fs::write(&comparison_path, doc)
        .map_err(|e| RunError::write(comparison_path.display().to_string(), e.to_string()))?;

    let key_path = out_dir.join(KEY_FILE);
    write_json(&key_path, &report.key)?;

    Ok(WrittenReport {
        comparison_path,
        key_path,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Category, LogEntry, Mode};

    pub fn entry(prompt_id: &str, category: Category, mode: Mode, text: &str) -> LogEntry {
        LogEntry {
            ts: "2026-01-01T00:00:00+00:00".into(),
            prompt_id: prompt_id.into(),
            category,
            mode,
            provider: "canned".into(),
            model: "canned".into(),
            temperature: 0.2,
            latency_s: 0.0,
            prompt: format!("prompt for {prompt_id}"),
            output_text: text.into(),
            error: None,
        }
    }

    pub fn pair(prompt_id: &str, category: Category) -> Vec<LogEntry> {
        vec![
            entry(prompt_id, category, Mode::Diastolic, &format!("{prompt_id} slow")),
            entry(prompt_id, category, Mode::Continuous, &format!("{prompt_id} fast")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{entry, pair};
    use super::*;
    use crate::errors::RunErrorKind;
    use tempfile::TempDir;

    fn meta() -> ReportMeta {
        ReportMeta {
            provider: "canned".into(),
            model: "canned".into(),
            temperature: 0.2,
            seed: 12345,
        }
    }

    #[test]
    fn entries_follow_first_appearance_and_blinding() {
        let mut records = pair("F1", Category::Factual);
        records.extend(pair("C2", Category::Creative));

        let report = build_report(&records, &meta()).unwrap();
        let ids: Vec<_> = report.entries.iter().map(|e| e.prompt_id.as_str()).collect();
        assert_eq!(ids, ["F1", "C2"]);

        for (entry, pair) in report.entries.iter().zip(&report.key.pairs) {
            let assignment = blinding::assign(&entry.prompt_id, 12345);
            assert_eq!((pair.a, pair.b), (assignment.a, assignment.b));
            let expect_a = match assignment.a {
                Mode::Continuous => format!("{} fast", entry.prompt_id),
                Mode::Diastolic => format!("{} slow", entry.prompt_id),
            };
            assert_eq!(entry.a_text, expect_a);
        }
    }

    #[test]
    fn partial_runs_are_not_reported() {
        let records = vec![entry("F1", Category::Factual, Mode::Continuous, "only one")];
        let err = build_report(&records, &meta()).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::IncompleteRun);
        assert!(err.message.contains("no diastolic record"));

        assert!(build_report(&[], &meta()).is_err());
    }

    #[test]
    fn duplicate_records_are_rejected() {
        let mut records = pair("F1", Category::Factual);
        records.push(entry("F1", Category::Factual, Mode::Diastolic, "again"));
        let err = build_report(&records, &meta()).unwrap_err();
        assert!(err.message.contains("duplicate diastolic record"));
    }

    #[test]
    fn write_report_creates_both_files() {
        let tmp = TempDir::new().unwrap();
        let report = build_report(&pair("E1", Category::Emotional), &meta()).unwrap();
        let written = write_report(tmp.path(), &report).unwrap();

        let doc = std::fs::read_to_string(&written.comparison_path).unwrap();
        assert!(doc.contains("## E1 (EMOTIONAL)"));
        let key = key::read_key(&written.key_path).unwrap();
        assert_eq!(key, report.key);
    }

    #[test]
    fn meta_from_log_uses_first_record() {
        let records = pair("D1", Category::Decision);
        let m = ReportMeta::from_log(&records, 7).unwrap();
        assert_eq!(m.provider, "canned");
        assert_eq!(m.seed, 7);
        assert!(ReportMeta::from_log(&[], 7).is_err());
    }
}

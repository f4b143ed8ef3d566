//! Offline end-to-end runs over the 20-prompt fixture set.
//!
//! Same seed and prompt set must give byte-identical comparison and key files,
//! a complete log, and a comparison the key maps back onto the recorded texts.

use diastole_core::config::{ProviderKind, RunConfig};
use diastole_core::engine::ExperimentRunner;
use diastole_core::instructions::Instructions;
use diastole_core::prompts::load_prompts;
use diastole_core::providers::build_client;
use diastole_core::recorder::read_log;
use diastole_core::report::key::read_key;
use diastole_core::report::markdown::{blinded_text, contains_mode_label};
use diastole_core::report::unblind::{unblind, verify_run};
use diastole_core::{blinding, Mode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config(out: &Path, seed: u64) -> RunConfig {
    RunConfig {
        provider: ProviderKind::Canned,
        model: "canned".into(),
        seed,
        sleep: Duration::ZERO,
        prompts_path: fixtures().join("prompts.json"),
        instructions_dir: fixtures().join("instructions"),
        out_dir: out.to_path_buf(),
        canned_responses: Some(fixtures().join("canned.json")),
        ..RunConfig::default()
    }
}

async fn run_once(seed: u64) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), seed);
    cfg.validate().unwrap();

    let prompts = load_prompts(&cfg.prompts_path).unwrap();
    let instructions = Instructions::load(&cfg.instructions_dir).unwrap();
    let client = build_client(&cfg).unwrap();

    ExperimentRunner::new(cfg, client)
        .with_progress(false)
        .run(&prompts, &instructions)
        .await
        .unwrap();
    tmp
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

#[tokio::test]
async fn same_seed_gives_byte_identical_outputs() {
    let first = run_once(12345).await;
    let second = run_once(12345).await;

    assert_eq!(read(&first, "comparison.md"), read(&second, "comparison.md"));
    assert_eq!(read(&first, "key.json"), read(&second, "key.json"));
}

#[tokio::test]
async fn blinding_depends_only_on_seed_and_id() {
    let run = run_once(12345).await;
    let key = read_key(&run.path().join("key.json")).unwrap();

    assert_eq!(key.pairs.len(), 20);
    for pair in &key.pairs {
        let expected = blinding::assign(&pair.prompt_id, 12345);
        assert_eq!((pair.a, pair.b), (expected.a, expected.b));
    }

    let other = run_once(54321).await;
    let other_key = read_key(&other.path().join("key.json")).unwrap();
    let differs = key
        .pairs
        .iter()
        .zip(&other_key.pairs)
        .any(|(x, y)| x.a != y.a);
    assert!(differs, "20 prompts under a new seed should move at least one pair");
}

#[tokio::test]
async fn log_is_complete_and_comparison_is_blind() {
    let run = run_once(7).await;
    let log = read_log(&run.path().join("outputs.jsonl")).unwrap();
    assert_eq!(log.len(), 40);

    let mut counts: HashMap<(String, Mode), usize> = HashMap::new();
    for e in &log {
        *counts.entry((e.prompt_id.clone(), e.mode)).or_default() += 1;
        assert!(e.error.is_none());
    }
    assert_eq!(counts.len(), 40);
    assert!(counts.values().all(|&n| n == 1));

    let doc = read(&run, "comparison.md");
    assert!(!contains_mode_label(&doc));
    assert!(!doc.contains("CONTINUOUS"));
    assert!(!doc.contains("DIASTOLIC"));
    assert!(doc.contains("## A1 (AMBIGUOUS)"));

    for id in ["F1", "D4"] {
        for mode in ["continuous", "diastolic"] {
            let path = run.path().join(format!("outputs/{mode}/{id}.json"));
            let full: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(full["raw_response"]["canned"], true);
        }
    }
}

#[tokio::test]
async fn key_recovers_recorded_texts() {
    let run = run_once(99).await;
    let doc = read(&run, "comparison.md");
    let key = read_key(&run.path().join("key.json")).unwrap();
    let log = read_log(&run.path().join("outputs.jsonl")).unwrap();

    let recovered = unblind(&doc, &key).unwrap();
    assert_eq!(recovered.len(), log.len());
    for e in &log {
        assert_eq!(
            recovered[&(e.prompt_id.clone(), e.mode)],
            blinded_text(&e.output_text),
            "{} {}",
            e.prompt_id,
            e.mode
        );
    }

    let prompts = load_prompts(&fixtures().join("prompts.json")).unwrap();
    let report = verify_run(run.path(), Some(&prompts)).unwrap();
    assert!(report.is_ok(), "{:?}", report.problems);
    assert_eq!(report.prompts, 20);
}

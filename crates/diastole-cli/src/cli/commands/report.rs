use super::super::args::ReportArgs;
use crate::exit_codes;
use diastole_core::config::DEFAULT_SEED;
use diastole_core::recorder::{read_log, LOG_FILE};
use diastole_core::report::key::read_key;
use diastole_core::report::{build_report, write_report, ReportMeta, WrittenReport, KEY_FILE};
use std::path::Path;

pub fn run(args: ReportArgs) -> anyhow::Result<i32> {
    match execute(&args) {
        Ok(written) => {
            println!("Wrote {}", written.comparison_path.display());
            println!("Wrote {}", written.key_path.display());
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            Ok(exit_codes::for_error(&e))
        }
    }
}

/// Rebuild the blinded files from the log alone; no provider is contacted.
fn execute(args: &ReportArgs) -> anyhow::Result<WrittenReport> {
    let entries = read_log(&args.out.join(LOG_FILE))?;
    let seed = match args.seed {
        Some(seed) => seed,
        None => existing_seed(&args.out)?,
    };
    let meta = ReportMeta::from_log(&entries, seed)?;
    let report = build_report(&entries, &meta)?;
    Ok(write_report(&args.out, &report)?)
}

/// Seed of the key already in `out`, so a plain `report` keeps the run's blinding.
fn existing_seed(out: &Path) -> anyhow::Result<u64> {
    let key_path = out.join(KEY_FILE);
    if !key_path.exists() {
        return Ok(DEFAULT_SEED);
    }
    let seed = read_key(&key_path)?.meta.seed;
    tracing::debug!(seed, "reusing seed from {}", key_path.display());
    Ok(seed)
}

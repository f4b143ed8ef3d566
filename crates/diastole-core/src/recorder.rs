use crate::errors::RunError;
use crate::model::{LogEntry, Mode, ResponseRecord};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const OUTPUTS_DIR: &str = "outputs";
pub const LOG_FILE: &str = "outputs.jsonl";

/// Writes every completed call to disk as soon as it returns.
#[derive(Debug)]
pub struct Recorder {
    out_dir: PathBuf,
    log_path: PathBuf,
}

impl Recorder {
    /// Prepare `out_dir` for a fresh run: per-mode record directories exist and
    /// any `outputs.jsonl` left by an earlier run is removed.
    pub fn create(out_dir: &Path) -> Result<Self, RunError> {
        for mode in Mode::ALL {
            let dir = mode_dir(out_dir, mode);
            std::fs::create_dir_all(&dir)
                .map_err(|e| RunError::write(dir.display().to_string(), e.to_string()))?;
        }

        let log_path = out_dir.join(LOG_FILE);
        if log_path.exists() {
            std::fs::remove_file(&log_path)
                .map_err(|e| RunError::write(log_path.display().to_string(), e.to_string()))?;
        }

        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            log_path,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Full record to `outputs/<mode>/<prompt_id>.json`, lean line to `outputs.jsonl`.
    pub fn record(&self, rec: &ResponseRecord) -> Result<PathBuf, RunError> {
        let path = record_path(&self.out_dir, rec.mode, &rec.prompt_id);
        write_json(&path, rec)?;
        append_jsonl(&self.log_path, &rec.lean())?;
        Ok(path)
    }
}

pub fn mode_dir(out_dir: &Path, mode: Mode) -> PathBuf {
    out_dir.join(OUTPUTS_DIR).join(mode.as_str())
}

pub fn record_path(out_dir: &Path, mode: Mode, prompt_id: &str) -> PathBuf {
    mode_dir(out_dir, mode).join(format!("{}.json", prompt_id))
}

/// Pretty JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RunError> {
    let mut body = serde_json::to_string_pretty(value)
        .map_err(|e| RunError::write(path.display().to_string(), e.to_string()))?;
    body.push('\n');
    std::fs::write(path, body)
        .map_err(|e| RunError::write(path.display().to_string(), e.to_string()))
}

pub fn append_jsonl<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RunError> {
    let shown = || path.display().to_string();
    let line =
        serde_json::to_string(value).map_err(|e| RunError::write(shown(), e.to_string()))?;
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RunError::write(shown(), e.to_string()))?;
    writeln!(f, "{}", line).map_err(|e| RunError::write(shown(), e.to_string()))
}

/// Read `outputs.jsonl` back. Blank lines are skipped; anything else must parse.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, RunError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
    let mut entries = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: LogEntry = serde_json::from_str(line).map_err(|e| {
            RunError::input_parse(
                path.display().to_string(),
                format!("line {}: {}", i + 1, e),
            )
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

use crate::errors::RunError;
use crate::model::Mode;
use std::path::Path;

pub const CONTINUOUS_FILE: &str = "continuous_instructions.txt";
pub const DIASTOLIC_FILE: &str = "diastolic_instructions.txt";

/// The two system instructions a run compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    continuous: String,
    diastolic: String,
}

impl Instructions {
    pub fn new(continuous: impl Into<String>, diastolic: impl Into<String>) -> Self {
        Self {
            continuous: continuous.into(),
            diastolic: diastolic.into(),
        }
    }

    /// Read both instruction files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, RunError> {
        Ok(Self {
            continuous: read_instruction(&dir.join(CONTINUOUS_FILE))?,
            diastolic: read_instruction(&dir.join(DIASTOLIC_FILE))?,
        })
    }

    pub fn for_mode(&self, mode: Mode) -> &str {
        match mode {
            Mode::Continuous => &self.continuous,
            Mode::Diastolic => &self.diastolic,
        }
    }
}

fn read_instruction(path: &Path) -> Result<String, RunError> {
    let text = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
    if text.trim().is_empty() {
        return Err(RunError::input_parse(
            path.display().to_string(),
            "instruction file is empty",
        ));
    }
    Ok(text)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prompting strategy a call is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Control: neutral system instruction.
    Continuous,
    /// Treatment: structured instruction with explicit pauses and uncertainty.
    Diastolic,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Continuous, Mode::Diastolic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Continuous => "continuous",
            Mode::Diastolic => "diastolic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Continuous => "CONTINUOUS",
            Mode::Diastolic => "DIASTOLIC",
        }
    }

    pub fn other(&self) -> Mode {
        match self {
            Mode::Continuous => Mode::Diastolic,
            Mode::Diastolic => Mode::Continuous,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(Mode::Continuous),
            "diastolic" => Ok(Mode::Diastolic),
            other => Err(format!(
                "unknown mode '{other}' (expected continuous|diastolic)"
            )),
        }
    }
}

/// Blinded position in the comparison document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => f.write_str("A"),
            Slot::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Factual,
    Ambiguous,
    Emotional,
    Creative,
    Decision,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Factual,
        Category::Ambiguous,
        Category::Emotional,
        Category::Creative,
        Category::Decision,
    ];

    /// Letter prompt ids of this category start with (`F1`, `A3`, ...).
    pub fn prefix(&self) -> char {
        match self {
            Category::Factual => 'F',
            Category::Ambiguous => 'A',
            Category::Emotional => 'E',
            Category::Creative => 'C',
            Category::Decision => 'D',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Factual => "FACTUAL",
            Category::Ambiguous => "AMBIGUOUS",
            Category::Emotional => "EMOTIONAL",
            Category::Creative => "CREATIVE",
            Category::Decision => "DECISION",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub category: Category,
    #[serde(rename = "prompt", alias = "text")]
    pub text: String,
}

/// Full per-call record, written to `outputs/<mode>/<prompt_id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub ts: String,
    pub prompt_id: String,
    pub category: Category,
    pub mode: Mode,
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub latency_s: f64,
    pub prompt: String,
    pub output_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub raw_response: serde_json::Value,
}

impl ResponseRecord {
    /// The record as it appears in the lean `outputs.jsonl` transcript.
    pub fn lean(&self) -> LogEntry {
        LogEntry {
            ts: self.ts.clone(),
            prompt_id: self.prompt_id.clone(),
            category: self.category,
            mode: self.mode,
            provider: self.provider.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            latency_s: self.latency_s,
            prompt: self.prompt.clone(),
            output_text: self.output_text.clone(),
            error: self.error.clone(),
        }
    }
}

/// One line of `outputs.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: String,
    pub prompt_id: String,
    pub category: Category,
    pub mode: Mode,
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub latency_s: f64,
    pub prompt: String,
    pub output_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Round to millisecond precision for `latency_s`.
pub fn round_latency(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_lowercase_and_labels_uppercase() {
        assert_eq!(
            serde_json::to_string(&Mode::Diastolic).unwrap(),
            "\"diastolic\""
        );
        assert_eq!(Mode::Continuous.label(), "CONTINUOUS");
        assert_eq!(Mode::Continuous.other(), Mode::Diastolic);
        assert_eq!("DIASTOLIC".parse::<Mode>().unwrap(), Mode::Diastolic);
        assert!("pause".parse::<Mode>().is_err());
    }

    #[test]
    fn category_prefixes_are_distinct() {
        let mut prefixes: Vec<char> = Category::ALL.iter().map(Category::prefix).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), Category::ALL.len());
    }

    #[test]
    fn prompt_accepts_text_alias() {
        let p: Prompt =
            serde_json::from_str(r#"{"id":"F1","category":"FACTUAL","text":"Why?"}"#).unwrap();
        assert_eq!(p.text, "Why?");
        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["prompt"], "Why?");
    }

    #[test]
    fn lean_entry_drops_raw_response() {
        let rec = ResponseRecord {
            ts: "2026-01-01T00:00:00+00:00".into(),
            prompt_id: "E2".into(),
            category: Category::Emotional,
            mode: Mode::Continuous,
            provider: "canned".into(),
            model: "canned".into(),
            temperature: 0.2,
            latency_s: 0.5,
            prompt: "hello".into(),
            output_text: "hi".into(),
            error: None,
            raw_response: serde_json::json!({"id": "resp_1"}),
        };
        let v = serde_json::to_value(rec.lean()).unwrap();
        assert!(v.get("raw_response").is_none());
        assert!(v.get("error").is_none());
        assert_eq!(v["output_text"], "hi");
    }

    #[test]
    fn latency_rounds_to_millis() {
        assert_eq!(round_latency(1.23456), 1.235);
        assert_eq!(round_latency(0.0), 0.0);
    }
}

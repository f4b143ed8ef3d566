//! `key.json`: the only artifact that maps slots back to modes.

use super::ReportMeta;
use crate::blinding::{self, BlindAssignment, BLINDING_SCHEME};
use crate::errors::RunError;
use crate::model::{Category, Mode};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMeta {
    pub seed: u64,
    pub salt: String,
    pub blinding: String,
    pub provider: String,
    pub model: String,
    pub temperature: f32,
}

impl KeyMeta {
    pub fn from_report_meta(meta: &ReportMeta) -> Self {
        Self {
            seed: meta.seed,
            salt: blinding::salt(meta.seed),
            blinding: BLINDING_SCHEME.to_string(),
            provider: meta.provider.clone(),
            model: meta.model.clone(),
            temperature: meta.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub prompt_id: String,
    pub category: Category,
    #[serde(rename = "A")]
    pub a: Mode,
    #[serde(rename = "B")]
    pub b: Mode,
}

impl KeyPair {
    pub fn assignment(&self) -> BlindAssignment {
        BlindAssignment {
            prompt_id: self.prompt_id.clone(),
            a: self.a,
            b: self.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFile {
    pub meta: KeyMeta,
    pub pairs: Vec<KeyPair>,
}

impl KeyFile {
    pub fn pair(&self, prompt_id: &str) -> Option<&KeyPair> {
        self.pairs.iter().find(|p| p.prompt_id == prompt_id)
    }
}

pub fn read_key(path: &Path) -> Result<KeyFile, RunError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
    let key: KeyFile = serde_json::from_str(&raw)
        .map_err(|e| RunError::input_parse(path.display().to_string(), e.to_string()))?;
    for pair in &key.pairs {
        if pair.a == pair.b {
            return Err(RunError::input_parse(
                path.display().to_string(),
                format!("pair {} maps both slots to {}", pair.prompt_id, pair.a),
            ));
        }
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn key_json_shape_is_stable() {
        let key = KeyFile {
            meta: KeyMeta::from_report_meta(&ReportMeta {
                provider: "openai".into(),
                model: "gpt-4.1".into(),
                temperature: 0.2,
                seed: 12345,
            }),
            pairs: vec![KeyPair {
                prompt_id: "F1".into(),
                category: Category::Factual,
                a: Mode::Diastolic,
                b: Mode::Continuous,
            }],
        };
        let v = serde_json::to_value(&key).unwrap();
        assert_eq!(v["meta"]["seed"], 12345);
        assert_eq!(v["meta"]["salt"], "12345");
        assert_eq!(v["pairs"][0]["A"], "diastolic");
        assert_eq!(v["pairs"][0]["B"], "continuous");
        assert_eq!(v["pairs"][0]["category"], "FACTUAL");
        assert_eq!(key.pair("F1").unwrap().assignment().b, Mode::Continuous);
        assert!(key.pair("F2").is_none());
    }

    #[test]
    fn read_key_rejects_degenerate_pairs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("key.json");
        std::fs::write(
            &path,
            r#"{"meta":{"seed":1,"salt":"1","blinding":"x","provider":"canned","model":"m","temperature":0.2},
               "pairs":[{"prompt_id":"F1","category":"FACTUAL","A":"continuous","B":"continuous"}]}"#,
        )
        .unwrap();
        let err = read_key(&path).unwrap_err();
        assert!(err.message.contains("maps both slots"));
    }
}

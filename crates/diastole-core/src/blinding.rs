//! Deterministic A/B slot assignment.
//!
//! The slot a mode lands in depends only on `(seed, prompt_id)`: never on call
//! order, wall-clock time or the responses themselves. Re-running with the same
//! seed and prompt set reproduces the same blinding.

use crate::model::{Mode, Slot};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Human-readable description written into the key file.
pub const BLINDING_SCHEME: &str = "sha256(\"<seed>:<prompt_id>\")[0..12] mod 2; 0 => A=continuous";

/// First 12 hex characters of SHA-256 over `text`.
pub fn stable_hash(text: &str) -> String {
    let mut h = Sha256::new();
    h.update(text.as_bytes());
    let mut hex = hex::encode(h.finalize());
    hex.truncate(12);
    hex
}

/// Salt recorded in the key. Decimal seed only.
pub fn salt(seed: u64) -> String {
    seed.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindAssignment {
    pub prompt_id: String,
    #[serde(rename = "A")]
    pub a: Mode,
    #[serde(rename = "B")]
    pub b: Mode,
}

impl BlindAssignment {
    pub fn mode_for(&self, slot: Slot) -> Mode {
        match slot {
            Slot::A => self.a,
            Slot::B => self.b,
        }
    }

    pub fn slot_for(&self, mode: Mode) -> Slot {
        if self.a == mode {
            Slot::A
        } else {
            Slot::B
        }
    }
}

pub fn assign(prompt_id: &str, seed: u64) -> BlindAssignment {
    let h = stable_hash(&format!("{}:{}", salt(seed), prompt_id));
    // 12 hex digits always parse: 48 bits in a u64.
    let value = u64::from_str_radix(&h[..12], 16).unwrap_or(0);
    let (a, b) = if value % 2 == 0 {
        (Mode::Continuous, Mode::Diastolic)
    } else {
        (Mode::Diastolic, Mode::Continuous)
    };
    BlindAssignment {
        prompt_id: prompt_id.to_string(),
        a,
        b,
    }
}

//! Blinded comparison document: rendering and reading it back.

use super::key::KeyFile;
use super::{ComparisonEntry, ReportMeta};
use crate::errors::RunError;
use crate::model::Category;
use regex::Regex;
use std::sync::OnceLock;

pub const REDACTED: &str = "[redacted]";

const A_MARKER: &str = "\n### Response A\n\n";
const B_MARKER: &str = "\n\n### Response B\n\n";
const ENTRY_END: &str = "\n\n---\n";
const PROMPT_OPENING: &str = "\n**Prompt**\n\n`";
const SLOT_HEADING: &str = "### Response ";
const SECTION_HEADING: &str = "## ";

fn mode_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\w*(?:continuous|diastolic)\w*").unwrap_or_else(|e| panic!("{e}"))
    })
}

/// Any word containing a mode identifier, in any case, replaced by `[redacted]`.
/// `DIASTOLIC_MODE` and `continuously` go whole.
pub fn redact_mode_labels(text: &str) -> String {
    mode_label_re().replace_all(text, REDACTED).into_owned()
}

pub fn contains_mode_label(text: &str) -> bool {
    mode_label_re().is_match(text)
}

/// Text exactly as a slot shows it: trimmed, redacted, and with any line that
/// would read as a section or slot heading escaped (`\## F1 (FACTUAL)` and
/// `\### Response B` render unchanged).
pub fn blinded_text(text: &str) -> String {
    let redacted = redact_mode_labels(text.trim());
    if !redacted.contains(SECTION_HEADING) {
        return redacted;
    }
    redacted
        .split('\n')
        .map(|line| {
            if line.starts_with(SECTION_HEADING) || line.starts_with(SLOT_HEADING) {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn header_line(prompt_id: &str, category: Category) -> String {
    format!("## {} ({})", prompt_id, category)
}

/// A code fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let longest = text.split(|c: char| c != '`').map(str::len).max().unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

pub fn render(meta: &ReportMeta, entries: &[ComparisonEntry]) -> String {
    let mut lines: Vec<String> = vec![
        "# Blinded Comparisons".to_string(),
        String::new(),
        format!("- provider: `{}`", redact_mode_labels(&meta.provider)),
        format!("- model: `{}`", redact_mode_labels(&meta.model)),
        format!("- temperature: `{}`", meta.temperature),
        format!("- seed: `{}`", meta.seed),
        String::new(),
    ];

    for e in entries {
        let prompt = redact_mode_labels(e.prompt.trim());
        let fence = fence_for(&prompt);
        lines.extend([
            header_line(&e.prompt_id, e.category),
            String::new(),
            "**Prompt**".to_string(),
            String::new(),
            fence.clone(),
            prompt,
            fence,
            String::new(),
            "### Response A".to_string(),
            String::new(),
            blinded_text(&e.a_text),
            String::new(),
            "### Response B".to_string(),
            String::new(),
            blinded_text(&e.b_text),
            String::new(),
            "---".to_string(),
            String::new(),
        ]);
    }

    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub prompt_id: String,
    pub a_text: String,
    pub b_text: String,
}

/// Recover the slot texts of a rendered document, section by section, in key order.
///
/// Sections are read one after another: header, fenced prompt, then the two
/// slots. The next section is searched for only past the current slot headings,
/// and response text cannot contain a section or slot heading since
/// [`blinded_text`] escapes them.
pub fn parse(doc: &str, key: &KeyFile) -> Result<Vec<ParsedEntry>, RunError> {
    let anchors: Vec<(String, String)> = key
        .pairs
        .iter()
        .map(|p| {
            let header = format!("\n{}\n", header_line(&p.prompt_id, p.category));
            let anchor = format!("{}{}", header, PROMPT_OPENING);
            (header, anchor)
        })
        .collect();
    let missing = |prompt_id: &str| {
        RunError::verify_failed(format!("comparison has no section for prompt {}", prompt_id))
    };

    let mut parsed = Vec::with_capacity(key.pairs.len());
    let mut start = match (key.pairs.first(), anchors.first()) {
        (Some(pair), Some((_, anchor))) => doc
            .find(anchor.as_str())
            .ok_or_else(|| missing(&pair.prompt_id))?,
        _ => return Ok(parsed),
    };

    for (i, pair) in key.pairs.iter().enumerate() {
        let malformed =
            |what: &str| RunError::verify_failed(format!("section {}: {}", pair.prompt_id, what));

        let body = &doc[start + anchors[i].0.len()..];
        let responses = skip_prompt_block(body).ok_or_else(|| malformed("unclosed prompt"))?;
        let responses_at = doc.len() - responses.len();

        let a_start = responses
            .find(A_MARKER)
            .map(|j| j + A_MARKER.len())
            .ok_or_else(|| malformed("missing Response A"))?;
        let b_at = responses[a_start..]
            .find(B_MARKER)
            .map(|j| a_start + j)
            .ok_or_else(|| malformed("missing Response B"))?;
        let a_text = &responses[a_start..b_at];

        let b_start = responses_at + b_at + B_MARKER.len();
        let end = match (key.pairs.get(i + 1), anchors.get(i + 1)) {
            (Some(next), Some((_, anchor))) => doc[b_start..]
                .find(anchor.as_str())
                .map(|j| b_start + j)
                .ok_or_else(|| missing(&next.prompt_id))?,
            _ => doc.len(),
        };
        let b_text = doc[b_start..end]
            .strip_suffix(ENTRY_END)
            .ok_or_else(|| malformed("missing section separator"))?;

        parsed.push(ParsedEntry {
            prompt_id: pair.prompt_id.clone(),
            a_text: a_text.to_string(),
            b_text: b_text.to_string(),
        });
        start = end;
    }
    Ok(parsed)
}

/// Everything after the closing fence of the prompt block at the top of `section`.
fn skip_prompt_block(section: &str) -> Option<&str> {
    let block = section.strip_prefix("\n**Prompt**\n\n")?;
    let fence_len = block.find(|c: char| c != '`')?;
    let fence = &block[..fence_len];
    let body = block[fence_len..].strip_prefix('\n')?;
    let close = body.find(&format!("\n{}\n", fence))?;
    Some(&body[close + fence_len + 1..])
}

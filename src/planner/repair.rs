//! JSON extraction and repair for raw generator output.
//!
//! Models wrap JSON in markdown fences, use smart or single quotes, and
//! leave trailing commas. Extraction finds the largest balanced object in
//! the text; repair applies a short list of mechanical fixes before giving
//! up.

use regex::Regex;

/// Extracts and repairs JSON objects embedded in model output.
pub struct JsonRepairer {
    fence_json: Regex,
    xml_decl: Regex,
    quote_after: Regex,
    quote_before: Regex,
    trailing_comma: Regex,
}

impl Default for JsonRepairer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRepairer {
    pub fn new() -> Self {
        Self {
            fence_json: Regex::new(r"(?i)```json").expect("Invalid regex"),
            xml_decl: Regex::new(r"(?is)<\?xml.*?\?>").expect("Invalid regex"),
            quote_after: Regex::new(r#"([{}\[\]:,])\s*'"#).expect("Invalid regex"),
            quote_before: Regex::new(r#"'\s*([{}\[\]:,])"#).expect("Invalid regex"),
            trailing_comma: Regex::new(r",\s*([}\]])").expect("Invalid regex"),
        }
    }

    /// Largest balanced `{...}` object in the text, after stripping fences
    /// and XML declarations. Brace counting is textual; braces inside JSON
    /// string values will skew it, which is acceptable for plan payloads.
    pub fn extract_largest_json(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let s = self.fence_json.replace_all(trimmed, "");
        let s = s.replace("```", "");
        let s = self.xml_decl.replace_all(&s, "").into_owned();

        let bytes = s.as_bytes();
        let mut best: Option<(usize, usize)> = None;
        for start in 0..bytes.len() {
            if bytes[start] != b'{' {
                continue;
            }
            let mut depth = 0i32;
            for j in start..bytes.len() {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            let len = j + 1 - start;
                            if best.map_or(true, |(_, best_len)| len > best_len) {
                                best = Some((start, len));
                            }
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        best.map(|(start, len)| s[start..start + len].to_string())
    }

    /// Parse text as JSON, applying quote and comma repairs when a direct
    /// parse fails. Returns `None` when the text is beyond repair.
    pub fn repair_to_json(&self, text: &str) -> Option<serde_json::Value> {
        let s0 = text.trim();
        if s0.is_empty() {
            return None;
        }
        if let Ok(value) = serde_json::from_str(s0) {
            return Some(value);
        }

        let s1 = s0
            .replace('\u{201c}', "\"")
            .replace('\u{201d}', "\"")
            .replace('\u{2018}', "'")
            .replace('\u{2019}', "'");
        let s1 = self.quote_after.replace_all(&s1, "$1\"");
        let s1 = self.quote_before.replace_all(&s1, "\"$1");
        let s1 = self.trailing_comma.replace_all(&s1, "$1");

        serde_json::from_str(&s1).ok()
    }

    /// Extraction followed by repair; falls back to repairing the whole
    /// text when no balanced object was found.
    pub fn repair_and_validate(&self, raw_text: &str) -> Option<serde_json::Value> {
        let candidate = self
            .extract_largest_json(raw_text)
            .unwrap_or_else(|| raw_text.to_string());
        self.repair_to_json(&candidate)
    }
}

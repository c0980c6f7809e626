//! JSON parser with fuzzy repair

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

use super::parser::{OutputParser, ParseError, ParseResult, ParserConfig};

/// JSON parser with repair capabilities.
///
/// Repairs are limited to structural damage (trailing commas, unclosed
/// brackets). String contents are never rewritten, so markdown bodies with
/// apostrophes or embedded code fences survive intact.
pub struct JsonParser {
    config: ParserConfig,
}

impl JsonParser {
    /// Create a new JSON parser with default config
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Parse and deserialize into `T`
    pub fn parse_as<T: DeserializeOwned>(&self, raw: &str) -> ParseResult<T> {
        let value = self.parse(raw)?;
        serde_json::from_value(value).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }

    /// Unwrap a response that is entirely one fenced block
    fn strip_code_fences(&self, input: &str) -> Option<String> {
        static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^```(?:json|JSON)?[ \t]*\n?([\s\S]*?)\n?```\s*$")
                .expect("code fence pattern is valid")
        });

        CODE_FENCE_RE
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|content| content.as_str().to_string())
    }

    /// Extract the first balanced JSON object/array from surrounding text
    fn extract_json(&self, input: &str) -> Option<String> {
        let start_obj = input.find('{');
        let start_arr = input.find('[');

        let (start, end_char) = match (start_obj, start_arr) {
            (Some(o), Some(a)) if o < a => (o, '}'),
            (Some(_), Some(a)) => (a, ']'),
            (Some(o), None) => (o, '}'),
            (None, Some(a)) => (a, ']'),
            (None, None) => return None,
        };

        let substring = &input[start..];
        let mut depth = 0i32;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in substring.char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' | '[' if !in_string => depth += 1,
                '}' | ']' if !in_string => {
                    depth -= 1;
                    if depth == 0 && c == end_char {
                        return Some(substring[..=i].to_string());
                    }
                }
                _ => {}
            }
        }

        // Unterminated: hand back the tail and let repair close it
        Some(substring.to_string())
    }

    /// Repair structural JSON damage outside of string literals
    fn repair_json(&self, input: &str) -> String {
        static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r",(\s*[}\]])").expect("trailing comma pattern is valid")
        });
        let mut result = TRAILING_COMMA_RE.replace_all(input, "$1").to_string();

        // Close whatever is still open, innermost first
        let mut open = Vec::new();
        let mut in_string = false;
        let mut escape_next = false;
        for c in result.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }
            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => open.push('}'),
                '[' if !in_string => open.push(']'),
                '}' | ']' if !in_string => {
                    open.pop();
                }
                _ => {}
            }
        }

        if in_string {
            result.push('"');
        }
        while let Some(closer) = open.pop() {
            result.push(closer);
        }

        result
    }

    fn try_parse(&self, input: &str) -> Option<serde_json::Value> {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
            return Some(value);
        }

        let extracted = self.extract_json(input)?;
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&extracted) {
            return Some(value);
        }

        if self.config.attempt_repair {
            let repaired = self.repair_json(&extracted);
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&repaired) {
                return Some(value);
            }
        }

        None
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputParser for JsonParser {
    type Output = serde_json::Value;

    fn parse(&self, raw: &str) -> ParseResult<Self::Output> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some(value) = self.try_parse(input) {
            return Ok(value);
        }

        if self.config.strip_code_fences {
            if let Some(unfenced) = self.strip_code_fences(input) {
                if let Some(value) = self.try_parse(unfenced.trim()) {
                    return Ok(value);
                }
            }
        }

        Err(ParseError::InvalidFormat(
            "Failed to parse JSON after repair attempts".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

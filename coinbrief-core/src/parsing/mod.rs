//! Structured Output Parsing
//!
//! Lenient extraction of JSON from model output before it is deserialized
//! into typed values.
//!
//! # Features
//!
//! - **Fuzzy JSON parsing**: Handles markdown fences, trailing commas, etc.
//! - **Surrounding prose**: Pulls the first balanced object or array out of text
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbrief_core::parsing::{JsonParser, OutputParser};
//!
//! let parser = JsonParser::new();
//! let result = parser.parse("```json\n{\"key\": \"value\",}\n```")?;
//! assert_eq!(result["key"], "value");
//! ```

mod json;
mod parser;

pub use json::JsonParser;
pub use parser::{OutputParser, ParseError, ParseResult, ParserConfig};

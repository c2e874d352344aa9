//! Recovery of a quiz array from free-form model output.
//!
//! Candidates are located by an ordered list of strategies, parsed as-is, and
//! on failure run once through a deterministic repair pass before a final
//! parse attempt. Nothing here is random, so the same input always yields the
//! same result.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::types::QuizQuestion;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("static regex"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("static regex"));

static QUOTE_NEWLINE_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""\s*\n\s*""#).expect("static regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON array found in model output")]
    NoJsonFound,

    #[error("model output is not a valid quiz array even after repair: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ways of finding the JSON array inside model text, tried in `ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Everything from the first `[` to the last `]`.
    BracketedArray,
    /// The body of a ``` or ```json fence.
    FencedBlock,
}

impl Strategy {
    pub const ORDER: [Strategy; 2] = [Strategy::BracketedArray, Strategy::FencedBlock];

    pub fn locate(self, raw: &str) -> Option<&str> {
        match self {
            Strategy::BracketedArray => {
                let start = raw.find('[')?;
                let end = raw.rfind(']')?;
                (end > start).then(|| &raw[start..=end])
            }
            Strategy::FencedBlock => FENCED_BLOCK
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::BracketedArray => f.write_str("bracketed array"),
            Strategy::FencedBlock => f.write_str("fenced block"),
        }
    }
}

/// First candidate produced by the strategy chain, with the strategy that found it.
pub fn locate_candidate(raw: &str) -> Option<(Strategy, &str)> {
    Strategy::ORDER
        .into_iter()
        .find_map(|strategy| strategy.locate(raw).map(|candidate| (strategy, candidate)))
}

/// Fixes the usual ways models break JSON. Steps run in a fixed order.
pub fn repair(candidate: &str) -> String {
    let fixed = TRAILING_COMMA.replace_all(candidate, "$1");
    let fixed = fixed.replace(r#"\\""#, r#"\""#);
    let fixed = QUOTE_NEWLINE_QUOTE.replace_all(&fixed, "\" \"");
    let fixed = fixed.replace(['\r', '\n'], " ");
    let fixed = WHITESPACE_RUN.replace_all(&fixed, " ");
    fixed.trim().to_string()
}

/// Locates, parses and, if needed, repairs a quiz array in raw model output.
pub fn extract_quiz(raw: &str) -> Result<Vec<QuizQuestion>, ExtractError> {
    let (strategy, candidate) = locate_candidate(raw).ok_or(ExtractError::NoJsonFound)?;
    log::debug!("quiz candidate located via {strategy}");

    match serde_json::from_str(candidate) {
        Ok(questions) => Ok(questions),
        Err(err) => {
            log::debug!("direct parse failed ({err}), attempting repair");
            let repaired = repair(candidate);
            Ok(serde_json::from_str(&repaired)?)
        }
    }
}

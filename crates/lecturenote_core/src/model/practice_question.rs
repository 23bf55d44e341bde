//! Practice question value object.
//!
//! # Responsibility
//! - Define the embedded multiple-choice question attached to a note.
//! - Provide the post-parse validation policy for questions.
//!
//! # Invariants
//! - Questions are never addressed individually; a note's question list is
//!   always replaced as a whole.
//! - `difficulty` uses the external labels `Regular` and `Difficult (imp)`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of answer options every question must carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Difficulty label for a practice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Regular question.
    Regular,
    /// Important or difficult question.
    #[serde(rename = "Difficult (imp)")]
    Difficult,
}

impl Difficulty {
    /// Returns the external label used in JSON and GraphQL payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Difficult => "Difficult (imp)",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Regular" => Ok(Self::Regular),
            "Difficult (imp)" => Ok(Self::Difficult),
            other => Err(format!(
                "unsupported difficulty `{other}`; expected `Regular` or `Difficult (imp)`"
            )),
        }
    }
}

/// Multiple-choice practice question generated for (or attached to) a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Should equal one entry of `options` verbatim.
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl PracticeQuestion {
    /// Checks the question contract.
    ///
    /// # Errors
    /// Returns a human-readable reason when:
    /// - `question` or `explanation` is blank,
    /// - `options` does not hold exactly four distinct non-blank strings,
    /// - `correct_answer` is not one of `options`.
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.explanation.trim().is_empty() {
            return Err("explanation is empty".to_string());
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "expected {OPTIONS_PER_QUESTION} options, got {}",
                self.options.len()
            ));
        }
        if self.options.iter().any(|option| option.trim().is_empty()) {
            return Err("options must not be empty".to_string());
        }
        let distinct: HashSet<&str> = self.options.iter().map(String::as_str).collect();
        if distinct.len() != self.options.len() {
            return Err("options must be distinct".to_string());
        }
        if !self.options.iter().any(|option| option == &self.correct_answer) {
            return Err(format!(
                "correct answer `{}` is not one of the options",
                self.correct_answer
            ));
        }
        Ok(())
    }
}

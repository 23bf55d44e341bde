//! Defensive parsing of practice question completions.
//!
//! # Invariants
//! - Never fails: unusable output yields an empty list.
//! - Every array entry carrying the question fields is kept, even when it
//!   breaks the `PracticeQuestion::validate` contract; only entries missing
//!   those fields are dropped.
//! - An unknown difficulty label falls back to `Regular`.

use crate::model::practice_question::{Difficulty, PracticeQuestion};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

// First `[` through the last `]`; the backend may wrap the array in prose.
static JSON_ARRAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid json array regex"));

/// Question shape as emitted by the backend, before label normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    difficulty: String,
    explanation: String,
}

impl GeneratedQuestion {
    fn into_question(self, index: usize) -> PracticeQuestion {
        let difficulty = self.difficulty.parse().unwrap_or_else(|reason| {
            warn!(
                "event=questions_parse module=enrich status=normalized index={} reason={}",
                index, reason
            );
            Difficulty::Regular
        });
        PracticeQuestion {
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            difficulty,
            explanation: self.explanation,
        }
    }
}

/// Returns the bracketed array literal inside `text`, or `text` itself.
pub fn extract_json_array(text: &str) -> &str {
    JSON_ARRAY_RE
        .find(text)
        .map_or(text, |matched| matched.as_str())
}

/// Parses completion text into practice questions, best effort.
pub fn parse_practice_questions(text: &str) -> Vec<PracticeQuestion> {
    let candidate = extract_json_array(text);
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(candidate) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "event=questions_parse module=enrich status=degraded reason=invalid_json error={}",
                err
            );
            return Vec::new();
        }
    };

    let total = entries.len();
    let questions: Vec<PracticeQuestion> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let question = match serde_json::from_value::<GeneratedQuestion>(entry) {
                Ok(generated) => generated.into_question(index),
                Err(err) => {
                    warn!(
                        "event=questions_parse module=enrich status=dropped index={} reason=shape error={}",
                        index, err
                    );
                    return None;
                }
            };
            if let Err(reason) = question.validate() {
                warn!(
                    "event=questions_parse module=enrich status=kept_unverified index={} reason={}",
                    index, reason
                );
            }
            Some(question)
        })
        .collect();

    if questions.len() < total {
        warn!(
            "event=questions_parse module=enrich status=partial kept={} total={}",
            questions.len(),
            total
        );
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::{extract_json_array, parse_practice_questions};
    use crate::model::practice_question::Difficulty;

    const TWO_QUESTIONS: &str = r#"[
      {"question": "What is S3?", "options": ["Storage", "Compute", "DNS", "Queue"],
       "correctAnswer": "Storage", "difficulty": "Regular", "explanation": "Object storage."},
      {"question": "What is IAM?", "options": ["Identity", "Billing", "CDN", "Cache"],
       "correctAnswer": "Identity", "difficulty": "Difficult (imp)", "explanation": "Access control."}
    ]"#;

    #[test]
    fn extract_strips_surrounding_commentary() {
        let text = "Sure! Here you go:\n[1, [2], 3]\nHope this helps.";
        assert_eq!(extract_json_array(text), "[1, [2], 3]");
        assert_eq!(extract_json_array("no array"), "no array");
    }

    #[test]
    fn parse_reads_wrapped_array() {
        let text = format!("Here are your questions:\n{TWO_QUESTIONS}\nGood luck!");
        let questions = parse_practice_questions(&text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].difficulty, Difficulty::Difficult);
        assert_eq!(questions[0].correct_answer, "Storage");
    }

    #[test]
    fn parse_degrades_to_empty_on_garbage() {
        assert!(parse_practice_questions("I cannot help with that.").is_empty());
        assert!(parse_practice_questions("").is_empty());
        assert!(parse_practice_questions("[not json at all]").is_empty());
    }

    #[test]
    fn parse_keeps_entries_that_break_the_question_contract() {
        let text = r#"Here you go:
        [
          {"question": "Q1", "options": ["A. EC2", "B. S3", "C. VPC", "D. SQS"],
           "correctAnswer": "B", "difficulty": "Regular", "explanation": "e"},
          {"question": "Q2", "options": ["EC2", "S3", "VPC", "SQS"], "correctAnswer": "S3 ",
           "difficulty": "Regular", "explanation": "e"},
          {"question": "Q3", "options": ["a", "b", "c", "d", "e"], "correctAnswer": "a",
           "difficulty": "Difficult (imp)", "explanation": "e"},
          {"question": "Q4", "options": ["a", "b", "c", "d"], "correctAnswer": "a",
           "difficulty": "Regular", "explanation": "e"}
        ]"#;
        let questions = parse_practice_questions(text);
        let texts: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(questions[0].correct_answer, "B");
        assert_eq!(questions[2].options.len(), 5);
    }

    #[test]
    fn parse_normalizes_unknown_difficulty_and_drops_shapeless_entries() {
        let text = r#"[
          {"question": "Q1", "options": ["a", "b", "c", "d"], "correctAnswer": "a",
           "difficulty": "Hard", "explanation": "e"},
          {"question": "Q2", "options": ["a", "b"]},
          "not an object"
        ]"#;
        let questions = parse_practice_questions(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1");
        assert_eq!(questions[0].difficulty, Difficulty::Regular);
    }
}

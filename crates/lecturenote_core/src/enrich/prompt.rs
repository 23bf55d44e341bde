//! Prompt construction for the two enrichment completions.

use super::backend::CompletionRequest;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert educational content summarizer. \
Create a concise, clear summary of the provided lecture notes in a bullet point format.";

const QUESTIONS_SYSTEM_PROMPT: &str = r#"You are an AWS Cloud Practitioner exam expert. Generate 4 multiple-choice questions based on the provided content.
For each question, include:
- question: The question text
- options: Array of 4 answer options
- correctAnswer: The correct answer text (must match one of the options)
- difficulty: Either "Difficult (imp)" for important/difficult questions or "Regular" for regular questions
- explanation: Brief explanation of the answer

Return ONLY valid JSON in this format:
[
  {
    "question": "...",
    "options": ["...", "...", "...", "..."],
    "correctAnswer": "...",
    "difficulty": "Regular" or "Difficult (imp)",
    "explanation": "..."
  }
]"#;

pub const SUMMARY_TEMPERATURE: f32 = 0.7;
pub const SUMMARY_MAX_TOKENS: u32 = 500;
pub const QUESTIONS_TEMPERATURE: f32 = 0.8;
pub const QUESTIONS_MAX_TOKENS: u32 = 1500;

/// Builds the bullet-point summary request.
pub fn summary_request(note_title: &str, content: &str) -> CompletionRequest {
    CompletionRequest {
        system: SUMMARY_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Please summarize these lecture notes:\n\nTitle: {note_title}\n\nContent:\n{content}"
        ),
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: SUMMARY_MAX_TOKENS,
    }
}

/// Builds the practice question request; the answer must be a JSON array.
pub fn questions_request(note_title: &str, content: &str) -> CompletionRequest {
    CompletionRequest {
        system: QUESTIONS_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Generate AWS Cloud Practitioner practice questions from these notes:\n\nTitle: {note_title}\n\nContent:\n{content}"
        ),
        temperature: QUESTIONS_TEMPERATURE,
        max_tokens: QUESTIONS_MAX_TOKENS,
    }
}

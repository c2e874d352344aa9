use crate::types::{OPTIONS_PER_QUESTION, QUIZ_LENGTH};

/// Builds the single user message sent to the model.
pub fn build_quiz_prompt(transcript: &str, char_limit: usize) -> String {
    let excerpt = truncate_chars(transcript, char_limit);

    format!(
        r#"Based on the following video transcript, create a quiz with exactly {count} multiple choice questions.

Transcript:
{excerpt}

Return ONLY a valid JSON array of exactly {count} objects, one per question, in this exact format:
[
  {{
    "question": "Question text here",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct": 0
  }}
]

Rules:
- "options" must contain exactly {options} strings
- "correct" is the 0-based index of the right option (0 to {max_index})
- Questions must be answerable from the transcript
- Do not use quotes, apostrophes or special characters inside question or option text
- Output nothing but the JSON array: no markdown, no explanation"#,
        count = QUIZ_LENGTH,
        options = OPTIONS_PER_QUESTION,
        max_index = OPTIONS_PER_QUESTION - 1,
    )
}

/// First `limit` characters of `text`, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

use crate::types::{Quiz, Transcript};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn format_transcript_summary(transcript: &Transcript) -> String {
    format!(
        "Video {} | {} words | language: {}",
        transcript.video_id, transcript.word_count, transcript.language
    )
}

/// Markdown rendering of a quiz, correct option marked with a check.
pub fn format_quiz_readable(quiz: &Quiz) -> String {
    let mut output = String::new();

    for (i, question) in quiz.questions.iter().enumerate() {
        output.push_str(&format!("### {}. {}\n\n", i + 1, question.question));
        for (j, option) in question.options.iter().enumerate() {
            let label = OPTION_LABELS.get(j).copied().unwrap_or('?');
            let mark = if j == question.correct { " ✓" } else { "" };
            output.push_str(&format!("{}) {}{}\n", label, option, mark));
        }
        output.push('\n');
    }

    output
}

use crate::{
    completion::{CompletionBackend, CompletionRequest},
    config::SynthesizerConfig,
    error::Result,
    extract::extract_quiz,
    fallback::fallback_quiz,
    prompt::build_quiz_prompt,
    types::{Quiz, validate_questions},
};

/// Prompts a model with a transcript and recovers a quiz from its reply.
pub struct QuizSynthesizer<B> {
    backend: B,
    config: SynthesizerConfig,
}

impl<B: CompletionBackend> QuizSynthesizer<B> {
    pub fn new(backend: B, config: SynthesizerConfig) -> Self {
        Self { backend, config }
    }

    /// Fails only on credential and upstream problems. Unusable model output
    /// yields the fallback quiz instead of an error.
    pub async fn synthesize_quiz(&self, transcript: &str) -> Result<Quiz> {
        let api_key = self.config.api_key()?;
        let prompt = build_quiz_prompt(transcript, self.config.transcript_char_limit);

        let raw = self
            .backend
            .complete(CompletionRequest {
                api_url: &self.config.api_url,
                model: &self.config.model,
                api_key,
                prompt: &prompt,
            })
            .await?;

        Ok(quiz_from_model_output(&raw))
    }
}

/// Model text to quiz, substituting the fallback when extraction or
/// validation fails.
pub fn quiz_from_model_output(raw: &str) -> Quiz {
    let questions = match extract_quiz(raw) {
        Ok(questions) => questions,
        Err(err) => {
            log::warn!("using fallback quiz: {err}");
            return fallback_quiz();
        }
    };

    if let Err(violation) = validate_questions(&questions) {
        log::warn!("using fallback quiz: model quiz rejected, {violation}");
        return fallback_quiz();
    }

    Quiz::from_model(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_question(i: usize) -> String {
        format!(
            r#"{{"question": "Question {i}", "options": ["a", "b", "c", "d"], "correct": {}}}"#,
            i % 4
        )
    }

    fn model_array(count: usize) -> String {
        let items: Vec<String> = (0..count).map(model_question).collect();
        format!("[{}]", items.join(", "))
    }

    #[test]
    fn valid_model_output_is_used() {
        let quiz = quiz_from_model_output(&format!("Here you go: {}", model_array(5)));
        assert!(!quiz.is_fallback());
        assert_eq!(quiz.len(), 5);
        assert_eq!(quiz.questions[3].question, "Question 3");
        assert_eq!(quiz.questions[3].correct, 3);
    }

    #[test]
    fn unparseable_output_falls_back() {
        let quiz = quiz_from_model_output("no quiz for you");
        assert!(quiz.is_fallback());
        assert_eq!(quiz, fallback_quiz());
    }

    #[test]
    fn wrong_question_count_falls_back() {
        let quiz = quiz_from_model_output(&model_array(3));
        assert!(quiz.is_fallback());
    }

    #[test]
    fn out_of_range_correct_index_falls_back() {
        let mut items: Vec<String> = (0..4).map(model_question).collect();
        items.push(r#"{"question": "Q", "options": ["a", "b", "c", "d"], "correct": 7}"#.into());
        let quiz = quiz_from_model_output(&format!("[{}]", items.join(",")));
        assert!(quiz.is_fallback());
    }
}

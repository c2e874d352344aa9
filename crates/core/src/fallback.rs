use crate::types::{Quiz, QuizOrigin, QuizQuestion};

/// Content-independent quiz handed out when model output cannot be recovered.
pub fn fallback_quiz() -> Quiz {
    Quiz {
        questions: vec![
            QuizQuestion::new(
                "What is the main topic discussed in this video?",
                [
                    "The primary subject presented by the speaker",
                    "An unrelated historical event",
                    "A cooking recipe",
                    "A sports match summary",
                ],
                0,
            ),
            QuizQuestion::new(
                "What is the best way to retain information from a video like this?",
                [
                    "Skip to the end",
                    "Take notes and review the key points",
                    "Watch it muted",
                    "Only read the title",
                ],
                1,
            ),
            QuizQuestion::new(
                "Why do presenters usually give examples?",
                [
                    "To make the video longer",
                    "To avoid the main topic",
                    "To illustrate and clarify ideas",
                    "To confuse the audience",
                ],
                2,
            ),
            QuizQuestion::new(
                "What should you do if a concept in the video is unclear?",
                [
                    "Ignore it entirely",
                    "Assume it is wrong",
                    "Stop learning the topic",
                    "Rewatch that section or look up more sources",
                ],
                3,
            ),
            QuizQuestion::new(
                "What is usually covered at the end of an educational video?",
                [
                    "A summary of the key takeaways",
                    "Random unrelated facts",
                    "A completely new topic",
                    "Nothing at all",
                ],
                0,
            ),
        ],
        origin: QuizOrigin::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_quiz_is_well_formed() {
        let quiz = fallback_quiz();
        assert!(quiz.is_fallback());
        assert_eq!(quiz.len(), 5);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn fallback_quiz_is_stable() {
        assert_eq!(fallback_quiz(), fallback_quiz());
    }
}

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TranscriptError;

/// Number of questions a quiz is expected to hold.
pub const QUIZ_LENGTH: usize = 5;

/// Number of options every question is expected to offer.
pub const OPTIONS_PER_QUESTION: usize = 4;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/)|youtube-nocookie\.com/embed/|youtu\.be/)([A-Za-z0-9_-]+)",
    )
    .expect("static regex")
});

/// Opaque, non-empty YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts a bare id (taken verbatim after trimming) or a YouTube URL,
    /// from which the id is pulled out.
    pub fn parse(input: &str) -> Result<Self, TranscriptError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TranscriptError::InvalidVideoId);
        }

        if let Some(caps) = YOUTUBE_URL.captures(input) {
            return Ok(Self(caps[1].to_string()));
        }

        if ["youtube.com", "youtube-nocookie.com", "youtu.be"]
            .iter()
            .any(|host| input.contains(host))
        {
            return Err(TranscriptError::InvalidVideoId);
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A timed caption snippet as handed over by a captions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Space-joined caption text that passed the quality gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language: String,
    pub text: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl QuizQuestion {
    pub fn new(question: &str, options: [&str; OPTIONS_PER_QUESTION], correct: usize) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
        }
    }

    pub fn validate(&self, index: usize) -> Result<(), SchemaViolation> {
        if self.question.trim().is_empty() {
            return Err(SchemaViolation::EmptyQuestion { index });
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(SchemaViolation::OptionCount {
                index,
                found: self.options.len(),
            });
        }
        if self.correct >= self.options.len() {
            return Err(SchemaViolation::CorrectOutOfRange {
                index,
                correct: self.correct,
            });
        }
        Ok(())
    }
}

/// Where a quiz came from: the model, or the hardcoded fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizOrigin {
    #[default]
    Model,
    Fallback,
}

/// Serialises as the bare question array; `origin` never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    #[serde(skip)]
    pub origin: QuizOrigin,
}

impl Quiz {
    pub fn from_model(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            origin: QuizOrigin::Model,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == QuizOrigin::Fallback
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn validate(&self) -> Result<(), SchemaViolation> {
        validate_questions(&self.questions)
    }
}

pub fn validate_questions(questions: &[QuizQuestion]) -> Result<(), SchemaViolation> {
    if questions.len() != QUIZ_LENGTH {
        return Err(SchemaViolation::QuestionCount {
            found: questions.len(),
        });
    }
    questions
        .iter()
        .enumerate()
        .try_for_each(|(i, q)| q.validate(i))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("expected {} questions, got {found}", QUIZ_LENGTH)]
    QuestionCount { found: usize },

    #[error("question {index} has no text")]
    EmptyQuestion { index: usize },

    #[error("question {index} has {found} options, expected {}", OPTIONS_PER_QUESTION)]
    OptionCount { index: usize, found: usize },

    #[error("question {index} marks option {correct} as correct, which does not exist")]
    CorrectOutOfRange { index: usize, correct: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> QuizQuestion {
        QuizQuestion::new("What is Rust?", ["A game", "A language", "A metal", "A fungus"], 1)
    }

    #[test]
    fn video_id_accepts_bare_ids_verbatim() {
        let id = VideoId::parse("  dQw4w9WgXcQ ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");

        let odd = VideoId::parse("not-a-real-looking-id").unwrap();
        assert_eq!(odd.as_str(), "not-a-real-looking-id");
    }

    #[test]
    fn video_id_rejects_empty_input() {
        assert!(matches!(
            VideoId::parse(""),
            Err(TranscriptError::InvalidVideoId)
        ));
        assert!(matches!(
            VideoId::parse("   \t"),
            Err(TranscriptError::InvalidVideoId)
        ));
    }

    #[test]
    fn video_id_extracted_from_urls() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=42",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?start=30",
        ];
        for case in cases {
            assert_eq!(VideoId::parse(case).unwrap().as_str(), "dQw4w9WgXcQ", "{case}");
        }
    }

    #[test]
    fn video_id_rejects_youtube_url_without_id() {
        assert!(VideoId::parse("https://www.youtube.com/feed/trending").is_err());
        assert!(VideoId::parse("https://www.youtube-nocookie.com/").is_err());
    }

    #[test]
    fn question_validation() {
        assert!(sample_question().validate(0).is_ok());

        let mut three_options = sample_question();
        three_options.options.pop();
        assert_eq!(
            three_options.validate(2),
            Err(SchemaViolation::OptionCount { index: 2, found: 3 })
        );

        let mut out_of_range = sample_question();
        out_of_range.correct = 4;
        assert!(matches!(
            out_of_range.validate(0),
            Err(SchemaViolation::CorrectOutOfRange { correct: 4, .. })
        ));

        let mut blank = sample_question();
        blank.question = "  ".into();
        assert!(matches!(
            blank.validate(0),
            Err(SchemaViolation::EmptyQuestion { .. })
        ));
    }

    #[test]
    fn quiz_requires_exact_question_count() {
        let quiz = Quiz::from_model(vec![sample_question(); 4]);
        assert_eq!(quiz.validate(), Err(SchemaViolation::QuestionCount { found: 4 }));

        let quiz = Quiz::from_model(vec![sample_question(); QUIZ_LENGTH]);
        assert!(quiz.validate().is_ok());
        assert!(!quiz.is_fallback());
    }

    #[test]
    fn quiz_serializes_as_question_array() {
        let quiz = Quiz {
            questions: vec![sample_question()],
            origin: QuizOrigin::Fallback,
        };
        let json = serde_json::to_value(&quiz).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["question"], "What is Rust?");
        assert_eq!(json[0]["correct"], 1);

        let back: Quiz = serde_json::from_value(json).unwrap();
        assert_eq!(back.questions, quiz.questions);
        assert_eq!(back.origin, QuizOrigin::Model);
    }
}

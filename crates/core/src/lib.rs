//! Tubequiz Core Library
//!
//! Fetches a YouTube video's captions into a transcript and asks a chat
//! model for a multiple-choice quiz about it, recovering the quiz from
//! whatever text the model sends back.

pub mod captions;
pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod format;
pub mod prompt;
pub mod provider;
pub mod synthesizer;
pub mod transcript;
pub mod types;

// Re-export commonly used items at crate root
pub use captions::{CaptionsError, CaptionsProvider, YoutubeCaptions};
pub use completion::{ChatCompletionsClient, CompletionBackend, CompletionRequest};
pub use config::{SynthesizerConfig, TranscriptConfig};
pub use error::{QuizError, Result, TranscriptError};
pub use extract::{ExtractError, Strategy, extract_quiz};
pub use fallback::fallback_quiz;
pub use format::{format_quiz_readable, format_transcript_summary};
pub use provider::{Provider, ProviderConfig};
pub use synthesizer::{QuizSynthesizer, quiz_from_model_output};
pub use transcript::TranscriptAssembler;
pub use types::{CaptionFragment, Quiz, QuizOrigin, QuizQuestion, Transcript, VideoId};

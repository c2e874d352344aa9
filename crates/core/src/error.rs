use thiserror::Error;

/// Failures of the transcript stage. Every condition the assembler can hit
/// ends up here, including the quality gate.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid YouTube video ID provided")]
    InvalidVideoId,

    #[error("No captions found for video {video_id}")]
    NoCaptionsFound { video_id: String },

    #[error("Not enough reliable information in the transcript")]
    TranscriptTooShort { word_count: usize, minimum: usize },

    #[error("Failed to extract transcript: {reason}")]
    ExtractionFailed { reason: String },
}

impl TranscriptError {
    /// Whether the caller supplied something unusable, as opposed to the
    /// provider or network failing underneath us.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TranscriptError::InvalidVideoId
                | TranscriptError::NoCaptionsFound { .. }
                | TranscriptError::TranscriptTooShort { .. }
        )
    }
}

/// Failures surfaced by the quiz stage. JSON extraction problems never show
/// up here; they degrade to the fallback quiz instead.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Missing API key for {provider}: {env_var} environment variable is not set")]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },

    #[error("API key was rejected by the upstream provider")]
    InvalidCredential,

    #[error("Rate limited by the upstream provider, try again later")]
    RateLimited,

    #[error("Upstream API error {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API response: {reason}")]
    InvalidApiResponse { reason: String },
}

impl QuizError {
    /// HTTP-style status a front end would answer with for this failure.
    pub fn status_hint(&self) -> u16 {
        match self {
            QuizError::MissingCredential { .. } => 500,
            QuizError::InvalidCredential => 400,
            QuizError::RateLimited => 429,
            QuizError::UpstreamError { .. }
            | QuizError::Http(_)
            | QuizError::InvalidApiResponse { .. } => 500,
        }
    }
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;

use crate::{
    captions::{CaptionsError, CaptionsProvider},
    config::TranscriptConfig,
    error::TranscriptError,
    types::{CaptionFragment, Transcript, VideoId},
};

/// Turns a video id into a gated, space-joined transcript.
pub struct TranscriptAssembler<P> {
    provider: P,
    config: TranscriptConfig,
}

impl<P: CaptionsProvider> TranscriptAssembler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, TranscriptConfig::default())
    }

    pub fn with_config(provider: P, config: TranscriptConfig) -> Self {
        Self { provider, config }
    }

    pub async fn get_transcript(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        let video_id = VideoId::parse(video_id)?;
        let language = self.config.language.as_str();

        let fragments = self
            .provider
            .fetch_captions(&video_id, language)
            .await
            .map_err(|e| classify_captions_error(&video_id, e))?;

        if fragments.is_empty() {
            return Err(TranscriptError::NoCaptionsFound {
                video_id: video_id.to_string(),
            });
        }
        log::debug!("{} caption fragments for {video_id}", fragments.len());

        let text = join_fragments(&fragments);
        let word_count = count_words(&text);
        if word_count < self.config.min_word_count {
            log::debug!(
                "transcript for {video_id} has {word_count} words, below the {} minimum",
                self.config.min_word_count
            );
            return Err(TranscriptError::TranscriptTooShort {
                word_count,
                minimum: self.config.min_word_count,
            });
        }

        Ok(Transcript {
            video_id,
            language: language.to_string(),
            text,
            word_count,
        })
    }
}

/// Fragment texts joined with a single space, provider order preserved.
pub fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn classify_captions_error(video_id: &VideoId, err: CaptionsError) -> TranscriptError {
    match err {
        CaptionsError::NoCaptions { .. } | CaptionsError::LanguageUnavailable { .. } => {
            TranscriptError::NoCaptionsFound {
                video_id: video_id.to_string(),
            }
        }
        other => {
            log::warn!("caption fetch for {video_id} failed: {other}");
            TranscriptError::ExtractionFailed {
                reason: other.to_string(),
            }
        }
    }
}

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{CaptionFragment, VideoId};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text start="([^"]*)" dur="([^"]*)"[^>]*>(.*?)</text>"#)
        .expect("static regex")
});

#[derive(Error, Debug)]
pub enum CaptionsError {
    #[error("No captions available for video {video_id}")]
    NoCaptions { video_id: String },

    #[error("No captions in language {language} for video {video_id}")]
    LanguageUnavailable { video_id: String, language: String },

    #[error("Video {video_id} is unavailable")]
    VideoUnavailable { video_id: String },

    #[error("YouTube is receiving too many requests from this address")]
    TooManyRequests,

    #[error("Unexpected caption payload: {reason}")]
    Malformed { reason: String },

    #[error("Caption request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of timed caption fragments for a video.
#[async_trait]
pub trait CaptionsProvider: Send + Sync {
    async fn fetch_captions(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Vec<CaptionFragment>, CaptionsError>;
}

/// Scrapes caption tracks straight off the YouTube watch page.
pub struct YoutubeCaptions {
    client: reqwest::Client,
    watch_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsBlock {
    player_captions_tracklist_renderer: Option<TrackList>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackList {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
}

impl YoutubeCaptions {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self::with_watch_url(client, WATCH_URL)
    }

    /// Points the scraper at another watch endpoint, e.g. a local mirror.
    pub fn with_watch_url(client: reqwest::Client, watch_url: impl Into<String>) -> Self {
        Self {
            client,
            watch_url: watch_url.into(),
        }
    }

    async fn caption_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, CaptionsError> {
        let page = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id.as_str())])
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_tracks(&page, video_id)
    }
}

impl Default for YoutubeCaptions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionsProvider for YoutubeCaptions {
    async fn fetch_captions(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Vec<CaptionFragment>, CaptionsError> {
        let tracks = self.caption_tracks(video_id).await?;
        let track = tracks
            .into_iter()
            .find(|t| t.language_code == language)
            .ok_or_else(|| CaptionsError::LanguageUnavailable {
                video_id: video_id.to_string(),
                language: language.to_string(),
            })?;

        log::debug!("fetching {language} captions for {video_id}");
        let xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_timed_text(&xml))
    }
}

fn parse_caption_tracks(page: &str, video_id: &VideoId) -> Result<Vec<CaptionTrack>, CaptionsError> {
    if page.contains("class=\"g-recaptcha\"") {
        return Err(CaptionsError::TooManyRequests);
    }
    if !page.contains("\"playabilityStatus\":") {
        return Err(CaptionsError::VideoUnavailable {
            video_id: video_id.to_string(),
        });
    }

    let no_captions = || CaptionsError::NoCaptions {
        video_id: video_id.to_string(),
    };

    let Some((_, after)) = page.split_once("\"captions\":") else {
        return Err(no_captions());
    };
    let Some((block, _)) = after.split_once(",\"videoDetails") else {
        return Err(CaptionsError::Malformed {
            reason: "captions block is not terminated".to_string(),
        });
    };

    let captions: CaptionsBlock =
        serde_json::from_str(block).map_err(|e| CaptionsError::Malformed {
            reason: e.to_string(),
        })?;

    match captions.player_captions_tracklist_renderer {
        Some(list) if !list.caption_tracks.is_empty() => Ok(list.caption_tracks),
        _ => Err(no_captions()),
    }
}

/// Parses YouTube timed-text XML into fragments, in document order.
pub fn parse_timed_text(xml: &str) -> Vec<CaptionFragment> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .map(|caps| {
            CaptionFragment::new(
                decode_entities(&caps[3]),
                caps[1].parse().unwrap_or(0.0),
                caps[2].parse().unwrap_or(0.0),
            )
        })
        .collect()
}

/// Caption text arrives entity-encoded, sometimes twice (`&amp;#39;`).
fn decode_entities(text: &str) -> String {
    let once = html_escape::decode_html_entities(text);
    html_escape::decode_html_entities(&once).into_owned()
}

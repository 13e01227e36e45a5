//! Speaking practice: prompts, pronunciation scoring and text-to-speech.
//! Synthesis happens on the backend; this only relays audio.

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{SpeakingAttempt, SpeakingPrompt, SpeakingScore};

const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

#[derive(Serialize)]
struct TtsPayload<'a> {
    text: &'a str,
}

/// Synthesized audio as returned by the backend
#[derive(Debug, Clone)]
pub struct Audio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub async fn fetch_prompts(api: &Authenticated<'_>) -> Result<Vec<SpeakingPrompt>, ApiError> {
    api.json(&ApiRequest::get("/speaking/prompts")).await
}

/// Compare what was said against the text it should have matched
pub async fn score(api: &Authenticated<'_>, attempt: &SpeakingAttempt) -> Result<SpeakingScore, ApiError> {
    api.json(&ApiRequest::post("/speaking/score", attempt)?).await
}

pub async fn generate_tts(api: &Authenticated<'_>, text: &str) -> Result<Audio, ApiError> {
    let request = ApiRequest::post("/speaking/tts", &TtsPayload { text })?;
    let response = api.send(&request).await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_TYPE)
        .to_string();
    let bytes = response.bytes().await?.to_vec();

    Ok(Audio {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[tokio::test]
    async fn test_tts_returns_audio_bytes() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        let audio = generate_tts(&client.authenticated(&creds), "cogent")
            .await
            .unwrap();
        assert_eq!(audio.content_type, "audio/mpeg");
        assert_eq!(audio.bytes, b"audio:cogent".to_vec());
    }

    #[tokio::test]
    async fn test_score_posts_both_texts() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        let attempt = SpeakingAttempt {
            expected_text: "I usually take the bus".to_string(),
            spoken_text: "I usually take bus".to_string(),
        };
        let result = score(&client.authenticated(&creds), &attempt).await.unwrap();
        assert_eq!(result.band(), Some(6.5));
        assert_eq!(
            mock.requests()[0].body,
            Some(serde_json::json!({
                "expected_text": "I usually take the bus",
                "spoken_text": "I usually take bus"
            }))
        );
    }
}

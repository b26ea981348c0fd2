use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::TranscriptSegment;

pub const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Remote Whisper transcription over an OpenAI-compatible
/// `audio/transcriptions` endpoint, requesting segment-level timestamps.
///
/// Transient failures (network errors, timeouts, 408/429/5xx) are retried
/// with exponential backoff up to `max_attempts` total attempts; 429
/// responses honor the `Retry-After` header. Content rejections and
/// malformed responses are never retried.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_attempts: u32,
}

impl OpenAiWhisperEngine {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        request_timeout: Duration,
        max_attempts: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        let base_url = base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        Self {
            client,
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
            max_attempts,
        }
    }

    async fn request_segments(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, AttemptError> {
        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name("chunk.wav")
            .mime_str("audio/wav")
            .expect("audio/wav is a valid mime type");

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .part("file", file_part);
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        tracing::debug!(model = %self.model, bytes = audio_data.len(), "Sending chunk to Whisper API");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AttemptError::transient(format!("request: {}", e)))?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Transient {
                message: format!("rate limited: {}", body),
                retry_after,
            });
        }

        if status.is_server_error() || status.as_u16() == 408 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AttemptError::transient(format!(
                "status {}: {}",
                status, body
            )));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AttemptError::Terminal(TranscriptionError::ContentRejected(
                format!("status {}: {}", status, body),
            )));
        }

        let result: VerboseTranscriptionResponse = response
            .json()
            .await
            .map_err(|e| {
                AttemptError::Terminal(TranscriptionError::MalformedResponse(format!(
                    "parse response: {}",
                    e
                )))
            })?;

        let api_segments = result.segments.ok_or_else(|| {
            AttemptError::Terminal(TranscriptionError::MalformedResponse(
                "response missing segments".to_string(),
            ))
        })?;

        let mut segments = Vec::with_capacity(api_segments.len());
        for api_segment in api_segments {
            segments.push(api_segment.into_segment().map_err(AttemptError::Terminal)?);
        }

        tracing::info!(segments = segments.len(), "Whisper transcription completed");

        Ok(segments)
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe_chunk(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, TranscriptionError> {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.request_segments(audio_data, language).await {
                Ok(segments) => return Ok(segments),
                Err(AttemptError::Terminal(e)) => return Err(e),
                Err(AttemptError::Transient {
                    message,
                    retry_after,
                }) => {
                    if attempt >= max_attempts {
                        return Err(TranscriptionError::RetriesExhausted {
                            attempts: attempt,
                            last_error: message,
                        });
                    }
                    let delay = retry_after.unwrap_or(backoff);
                    tracing::warn!(
                        error = %message,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Transient transcription failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }
}

enum AttemptError {
    Transient {
        message: String,
        retry_after: Option<Duration>,
    },
    Terminal(TranscriptionError),
}

impl AttemptError {
    fn transient(message: String) -> Self {
        AttemptError::Transient {
            message,
            retry_after: None,
        }
    }
}

#[derive(Deserialize)]
struct VerboseTranscriptionResponse {
    segments: Option<Vec<ApiSegment>>,
}

#[derive(Deserialize)]
struct ApiSegment {
    start: f64,
    end: f64,
    text: String,
    avg_logprob: Option<f32>,
}

impl ApiSegment {
    fn into_segment(self) -> Result<TranscriptSegment, TranscriptionError> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start < 0.0 {
            return Err(TranscriptionError::MalformedResponse(format!(
                "segment has invalid timestamps: start={} end={}",
                self.start, self.end
            )));
        }
        if self.end < self.start {
            return Err(TranscriptionError::MalformedResponse(format!(
                "segment ends before it starts: start={} end={}",
                self.start, self.end
            )));
        }

        Ok(TranscriptSegment {
            start_ms: (self.start * 1000.0).round() as u64,
            end_ms: (self.end * 1000.0).round() as u64,
            text: self.text.trim().to_string(),
            confidence: self.avg_logprob,
        })
    }
}

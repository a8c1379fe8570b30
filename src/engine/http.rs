//! Remote transcription over a chat-completions style HTTP endpoint.
//!
//! Sends the chunk as base64 WAV inside a single user message, with a
//! transcription prompt that carries the accumulated transcript so the model
//! can join sentences across chunk boundaries.

use crate::engine::TranscriptionEngine;
use crate::error::{Result, ScribeError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    InputAudio { input_audio: AudioData },
}

#[derive(Serialize, Debug)]
struct AudioData {
    data: String,
    format: String,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Transcription engine backed by a remote chat-completions API.
pub struct HttpEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpEngine {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Builds the transcription prompt for one chunk.
    ///
    /// The first chunk gets a plain transcription instruction; later chunks
    /// embed the transcript so far so partial sentences join across chunk
    /// boundaries. Silent audio must yield an empty result, not a marker.
    fn build_prompt(context: &str) -> String {
        if context.is_empty() {
            "You are transcribing consecutive chunks of a live audio stream. \
             Transcribe this chunk directly, with correct punctuation, paying \
             close attention to the very beginning of the audio. Output only \
             the transcribed text."
                .to_string()
        } else {
            format!(
                "Accounting for the existing conversation so far:\n\n{}\n\n\
                 Transcribe this audio chunk directly, with correct punctuation, \
                 joining any partial sentence from the previous chunk. Output \
                 only the transcribed text. If the audio contains no spoken \
                 words, return an empty output.",
                context
            )
        }
    }

    fn build_request(&self, audio: &[u8], mime_type: &str, context: &str) -> ChatCompletionRequest {
        let format = mime_type.strip_prefix("audio/").unwrap_or(mime_type);
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    MessageContent::Text {
                        text: Self::build_prompt(context),
                    },
                    MessageContent::InputAudio {
                        input_audio: AudioData {
                            data: STANDARD.encode(audio),
                            format: format.to_string(),
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for HttpEngine {
    async fn transcribe(&self, audio: &[u8], mime_type: &str, context: &str) -> Result<String> {
        let request = self.build_request(audio, mime_type, context);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScribeError::Engine {
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScribeError::Engine {
                message: format!("endpoint returned {}: {}", status, body),
            });
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| ScribeError::Engine {
                message: format!("invalid response body: {}", e),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScribeError::Engine {
                message: "response contained no transcription".to_string(),
            })
    }

    fn name(&self) -> &str {
        &self.model
    }
}

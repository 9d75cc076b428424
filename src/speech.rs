use axum::Extension;
use serde_json::Value;
use std::sync::Arc;
use tokio::process::Command;

pub type SttExtension = Extension<Arc<SpeechToText>>;
pub type TtsExtension = Extension<Arc<TextToSpeech>>;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
	#[error("Could not understand the audio.")]
	Unintelligible,

	#[error("Could not request results from the speech recognition service; {0}")]
	Service(String),
}

/// Forwards uploaded audio to a cloud transcription endpoint.
pub struct SpeechToText {
	http: reqwest::Client,
	url: String,
}

impl SpeechToText {
	pub fn new(url: &str) -> Self {
		Self {
			http: reqwest::Client::new(),
			url: url.to_string(),
		}
	}

	pub fn extension(self) -> SttExtension {
		Extension(Arc::new(self))
	}

	pub async fn transcribe(
		&self,
		file_name: &str,
		audio: Vec<u8>,
	) -> Result<String, TranscriptionError> {
		let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
		let form = reqwest::multipart::Form::new()
			.part("file", part)
			.text("model", "whisper-1");

		let response = self
			.http
			.post(&self.url)
			.multipart(form)
			.send()
			.await
			.map_err(|err| TranscriptionError::Service(err.to_string()))?;
		if !response.status().is_success() {
			return Err(TranscriptionError::Service(format!(
				"status {}",
				response.status()
			)));
		}

		let body: Value = response
			.json()
			.await
			.map_err(|err| TranscriptionError::Service(err.to_string()))?;
		let text = body["text"].as_str().unwrap_or("").trim().to_string();
		if text.is_empty() {
			return Err(TranscriptionError::Unintelligible);
		}

		Ok(text)
	}
}

/// Speaks replies through a local synthesizer command.
pub struct TextToSpeech {
	command: String,
}

impl TextToSpeech {
	pub fn new(command: &str) -> Self {
		Self {
			command: command.to_string(),
		}
	}

	pub fn extension(self) -> TtsExtension {
		Extension(Arc::new(self))
	}

	/// Fire-and-forget; a missing synthesizer only logs.
	pub fn speak(&self, text: &str) {
		let command = self.command.clone();
		let text = text.to_string();
		tokio::spawn(async move {
			match Command::new(&command).arg(&text).status().await {
				Ok(status) if status.success() => {},
				Ok(status) => tracing::warn!("Synthesizer {command} exited with {status}"),
				Err(err) => tracing::warn!("Couldn't run synthesizer {command}: {err}"),
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unintelligible_audio_has_the_documented_message() {
		assert_eq!(
			TranscriptionError::Unintelligible.to_string(),
			"Could not understand the audio."
		);
	}

	#[test]
	fn service_failures_carry_the_cause() {
		let err = TranscriptionError::Service("status 503".to_string());
		assert_eq!(
			err.to_string(),
			"Could not request results from the speech recognition service; status 503"
		);
	}
}

use aide::axum::ApiRouter;
use axum::{extract::Multipart, http::StatusCode, routing::post, Extension};
use axum_jsonschema::Json;
use schemars::JsonSchema;
use tokio::fs;

use crate::{
	embedder::EmbedderExtension,
	errors::HTTPError,
	llm::LlmExtension,
	server::{upload_file_name, MediaDirsExtension},
	shutdown::ShutdownExtension,
	speech::{SttExtension, TranscriptionError, TtsExtension},
	store::{StoreExtension, DEFAULT_TOP_K},
};

pub fn handler() -> ApiRouter {
	ApiRouter::new().route("/voice-query/", post(voice_query))
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct VoiceResponse {
	response: String,
	query_text: String,
}

/// Answer a spoken query from an uploaded audio clip
#[allow(clippy::too_many_arguments)]
async fn voice_query(
	Extension(store): StoreExtension,
	Extension(embedder): EmbedderExtension,
	Extension(llm): LlmExtension,
	Extension(stt): SttExtension,
	Extension(tts): TtsExtension,
	Extension(shutdown): ShutdownExtension,
	Extension(dirs): MediaDirsExtension,
	mut multipart: Multipart,
) -> Result<Json<VoiceResponse>, HTTPError> {
	let mut upload = None;
	while let Some(field) = multipart.next_field().await.map_err(|_| {
		HTTPError::new("Malformed multipart body").with_status(StatusCode::BAD_REQUEST)
	})? {
		if let Some(file_name) = field.file_name().map(upload_file_name) {
			let data = field.bytes().await.map_err(|_| {
				HTTPError::new("Couldn't read the uploaded file")
					.with_status(StatusCode::BAD_REQUEST)
			})?;
			upload = Some((file_name, data.to_vec()));
			break;
		}
	}

	let Some((file_name, audio)) = upload else {
		return Err(
			HTTPError::new("No audio file in the request").with_status(StatusCode::BAD_REQUEST)
		);
	};

	let path = dirs.audio.join(&file_name);
	if let Err(err) = fs::write(&path, &audio).await {
		tracing::warn!("Couldn't keep a copy of {}: {err}", path.display());
	}

	let query_text = stt.transcribe(&file_name, audio).await.map_err(|err| {
		let status = match err {
			TranscriptionError::Unintelligible => StatusCode::BAD_REQUEST,
			TranscriptionError::Service(_) => StatusCode::BAD_GATEWAY,
		};
		HTTPError::new(&err.to_string()).with_status(status)
	})?;
	tracing::info!("User: {query_text}");

	if query_text.to_lowercase().contains("terminate") {
		tts.speak("Goodbye!");
		shutdown.trigger();
		return Ok(Json(VoiceResponse {
			response: "Goodbye!".to_string(),
			query_text,
		}));
	}

	let vector = embedder.embed_text(&query_text)?;
	let candidates = store.search(vector, DEFAULT_TOP_K).await?;
	let response = llm.respond(&query_text, &candidates, None).await;
	tts.speak(&response);

	Ok(Json(VoiceResponse {
		response,
		query_text,
	}))
}

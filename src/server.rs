use aide::openapi::{self, OpenApi};
use anyhow::Result;
use axum::{http::HeaderValue, Extension, Server};
use std::{env, fs, net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
	cors::{Any, CorsLayer},
	services::ServeDir,
};

use crate::{
	cart::Cart,
	embedder::Embedder,
	llm::LlmClient,
	routes,
	shutdown::Shutdown,
	speech::{SpeechToText, TextToSpeech},
	store::VectorStore,
	AssistantArgs,
};

/// Directories uploads land in, shared with the ingest and voice routes.
pub struct MediaDirs {
	pub images: PathBuf,
	pub audio: PathBuf,
}

pub type MediaDirsExtension = Extension<Arc<MediaDirs>>;

impl MediaDirs {
	pub fn extension(self) -> MediaDirsExtension {
		Extension(Arc::new(self))
	}
}

/// Uploads are stored flat, whatever path the client claims.
pub fn upload_file_name(claimed: &str) -> String {
	std::path::Path::new(claimed)
		.file_name()
		.map_or_else(String::new, |name| name.to_string_lossy().to_string())
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) async fn start(args: AssistantArgs) -> Result<()> {
	let mut openapi = OpenApi {
		info: openapi::Info {
			title: "Shopvoice".to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
			..openapi::Info::default()
		},
		..OpenApi::default()
	};

	fs::create_dir_all(&args.image_dir)?;
	fs::create_dir_all(&args.audio_dir)?;

	let store = VectorStore::connect(&args.qdrant_url)?;
	let embedder = Embedder::load()?;
	let llm = LlmClient::new(&args.llm_url, &args.llm_model, &args.api_key);
	let stt = SpeechToText::new(&args.stt_url);
	let tts = TextToSpeech::new(&args.tts_command);
	let dirs = MediaDirs {
		images: args.image_dir.clone(),
		audio: args.audio_dir.clone(),
	};
	let shutdown = Shutdown::new()?;

	let cors = CorsLayer::new()
		.allow_origin(args.frontend_origin.parse::<HeaderValue>()?)
		.allow_methods(Any)
		.allow_headers(Any);

	let router = routes::handler().finish_api(&mut openapi);

	let router = router
		.nest_service("/images", ServeDir::new(&args.image_dir))
		.layer(Extension(openapi))
		.layer(shutdown.extension())
		.layer(store.extension())
		.layer(embedder.extension())
		.layer(llm.extension())
		.layer(stt.extension())
		.layer(tts.extension())
		.layer(dirs.extension())
		.layer(Cart::default().extension())
		.layer(cors);

	let addr = SocketAddr::from((
		[0, 0, 0, 0],
		env::var("PORT").map_or(Ok(8000), |p| p.parse())?,
	));
	tracing::info!("Starting server on {addr}...");
	Server::bind(&addr)
		.serve(router.into_make_service())
		.with_graceful_shutdown(shutdown.handle())
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn claimed_paths_are_stripped_to_the_file_name() {
		assert_eq!(upload_file_name("th.jpg"), "th.jpg");
		assert_eq!(upload_file_name("../../etc/passwd"), "passwd");
		assert_eq!(upload_file_name("uploads/th.jpg"), "th.jpg");
	}
}

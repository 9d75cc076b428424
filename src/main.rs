#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{
	prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

mod cart;
mod catalog;
mod embedder;
mod errors;
mod llm;
mod routes;
mod server;
mod shutdown;
mod speech;
mod store;

#[derive(Parser)]
pub struct AssistantArgs {
	/// Qdrant gRPC endpoint holding the product collection
	#[arg(long, default_value = "http://localhost:6334")]
	pub qdrant_url: String,
	/// Directory product images are written to and served from
	#[arg(long, default_value = "./images")]
	pub image_dir: PathBuf,
	/// Directory uploaded voice clips are written to
	#[arg(long, default_value = "./audio")]
	pub audio_dir: PathBuf,
	/// Chat-completions endpoint used to phrase responses
	#[arg(long, default_value = "https://api.ai71.ai/v1/chat/completions")]
	pub llm_url: String,
	/// Model requested from the chat-completions endpoint
	#[arg(long, default_value = "tiiuae/falcon-180B-chat")]
	pub llm_model: String,
	/// API key for the chat-completions endpoint
	#[arg(long, env = "AI71_API_KEY", hide_env_values = true)]
	pub api_key: String,
	/// Speech-to-text endpoint voice clips are forwarded to
	#[arg(long, default_value = "http://localhost:9000/v1/audio/transcriptions")]
	pub stt_url: String,
	/// Local synthesizer command replies are spoken with
	#[arg(long, default_value = "espeak")]
	pub tts_command: String,
	/// Frontend origin allowed by CORS
	#[arg(long, default_value = "http://localhost:3000")]
	pub frontend_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = AssistantArgs::parse();
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().with_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| "shopvoice=info".into()),
		))
		.init();

	server::start(args).await
}

use anyhow::{ensure, Result};
use axum::Extension;
use fastembed::{
	EmbeddingModel, ImageEmbedding, ImageEmbeddingModel, ImageInitOptions, InitOptions,
	TextEmbedding,
};
use std::{path::Path, sync::Arc};

/// Dimension of the CLIP ViT-B/32 space both towers project into.
pub const EMBEDDING_DIM: usize = 512;

pub type EmbedderExtension = Extension<Arc<Embedder>>;

/// CLIP ViT-B/32 text and image towers, loaded once at startup. Queries and
/// product images land in the same 512-dim space.
pub struct Embedder {
	text: TextEmbedding,
	image: ImageEmbedding,
}

impl Embedder {
	pub fn load() -> Result<Self> {
		tracing::info!("Loading CLIP ViT-B/32 towers...");
		let text = TextEmbedding::try_new(
			InitOptions::new(EmbeddingModel::ClipVitB32).with_show_download_progress(true),
		)?;
		let image = ImageEmbedding::try_new(
			ImageInitOptions::new(ImageEmbeddingModel::ClipVitB32)
				.with_show_download_progress(true),
		)?;

		Ok(Self { text, image })
	}

	pub fn extension(self) -> EmbedderExtension {
		Extension(Arc::new(self))
	}

	pub fn embed_text(&self, query: &str) -> Result<Vec<f32>> {
		let mut embeddings = self.text.embed(vec![query], None)?;
		ensure!(!embeddings.is_empty(), "text tower returned no embedding");

		Ok(embeddings.remove(0))
	}

	pub fn embed_image(&self, path: &Path) -> Result<Vec<f32>> {
		let mut embeddings = self.image.embed(vec![path], None)?;
		ensure!(!embeddings.is_empty(), "image tower returned no embedding");

		let vector = embeddings.remove(0);
		ensure!(
			vector.len() == EMBEDDING_DIM,
			"expected {EMBEDDING_DIM} dimensions but got {}",
			vector.len()
		);

		Ok(vector)
	}
}

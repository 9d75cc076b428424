use aide::axum::ApiRouter;
use axum::{extract::Multipart, http::StatusCode, routing::post, Extension};
use axum_jsonschema::Json;
use schemars::JsonSchema;
use tokio::fs;

use crate::{
	catalog::{self, ProductRecord},
	embedder::EmbedderExtension,
	errors::HTTPError,
	server::{upload_file_name, MediaDirsExtension},
	store::{StoreExtension, COLLECTION_NAME},
};

pub fn handler() -> ApiRouter {
	ApiRouter::new().route("/ingest/", post(ingest_images))
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct IngestResponse {
	message: String,
	images: Vec<ProductRecord>,
}

/// Store the uploaded product images and rebuild the collection from them
async fn ingest_images(
	Extension(store): StoreExtension,
	Extension(embedder): EmbedderExtension,
	Extension(dirs): MediaDirsExtension,
	mut multipart: Multipart,
) -> Result<Json<IngestResponse>, HTTPError> {
	let mut uploads = Vec::new();
	while let Some(field) = multipart.next_field().await.map_err(|_| {
		HTTPError::new("Malformed multipart body").with_status(StatusCode::BAD_REQUEST)
	})? {
		let Some(file_name) = field.file_name().map(upload_file_name) else {
			continue;
		};
		let data = field.bytes().await.map_err(|_| {
			HTTPError::new("Couldn't read the uploaded file")
				.with_status(StatusCode::BAD_REQUEST)
		})?;

		let path = dirs.images.join(&file_name);
		fs::write(&path, &data).await.map_err(|err| {
			tracing::error!("Couldn't write {}: {err}", path.display());
			HTTPError::new("Couldn't store the uploaded image")
		})?;
		uploads.push((catalog::record_for(&file_name), path));
	}

	if uploads.is_empty() {
		return Err(
			HTTPError::new("No image files in the request").with_status(StatusCode::BAD_REQUEST)
		);
	}

	tracing::trace!("Rebuilding {COLLECTION_NAME} from {} uploads", uploads.len());

	let mut points = Vec::new();
	let mut images = Vec::new();
	for (record, path) in uploads {
		match embedder.embed_image(&path) {
			Ok(vector) => points.push((record.clone(), vector)),
			Err(err) => {
				tracing::error!("Error extracting features from {}: {err:#}", path.display());
			},
		}
		images.push(record);
	}

	store.recreate().await?;
	let inserted = store.upsert(points).await?;
	tracing::info!("Inserted {inserted} points into the vector database");

	Ok(Json(IngestResponse {
		message: "Images ingested successfully".to_string(),
		images,
	}))
}

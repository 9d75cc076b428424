use anyhow::Result;
use axum::Extension;
use qdrant_client::{
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
		Value, VectorParamsBuilder,
	},
	Payload, Qdrant,
};
use schemars::JsonSchema;
use serde_json::json;
use std::{collections::HashMap, sync::Arc};

use crate::{catalog::ProductRecord, embedder::EMBEDDING_DIM};

pub const COLLECTION_NAME: &str = "image_vectors";

/// Neighbours retrieved per query, as in the original assistant.
pub const DEFAULT_TOP_K: u64 = 3;

pub type StoreExtension = Extension<Arc<VectorStore>>;

/// A retrieved product, shaped the way the query route returns it.
#[derive(Debug, Clone, serde::Serialize, JsonSchema)]
pub struct Candidate {
	pub id: String,
	pub filename: String,
	pub description: String,
	pub price: f64,
}

impl Candidate {
	/// Reshapes a point payload, tolerating missing fields the way the
	/// original assistant did.
	fn from_payload(payload: &HashMap<String, Value>) -> Self {
		Self {
			id: payload_str(payload, "id", "unknown_id"),
			filename: payload_str(payload, "file_name", "unknown.jpg"),
			description: payload_str(payload, "description", "No description"),
			price: payload_f64(payload, "price"),
		}
	}
}

fn payload_str(payload: &HashMap<String, Value>, key: &str, fallback: &str) -> String {
	payload
		.get(key)
		.and_then(|value| value.clone().into_json().as_str().map(ToString::to_string))
		.unwrap_or_else(|| fallback.to_string())
}

fn payload_f64(payload: &HashMap<String, Value>, key: &str) -> f64 {
	payload
		.get(key)
		.and_then(|value| value.clone().into_json().as_f64())
		.unwrap_or(0.0)
}

/// Qdrant glue around the `image_vectors` collection.
pub struct VectorStore {
	client: Qdrant,
}

impl VectorStore {
	pub fn connect(url: &str) -> Result<Self> {
		let client = Qdrant::from_url(url).build()?;

		Ok(Self { client })
	}

	pub fn extension(self) -> StoreExtension {
		Extension(Arc::new(self))
	}

	/// Drops and recreates the collection; the ingest flow always starts clean.
	pub async fn recreate(&self) -> Result<()> {
		if let Err(err) = self.client.delete_collection(COLLECTION_NAME).await {
			tracing::debug!("No collection to delete: {err}");
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(COLLECTION_NAME).vectors_config(
					VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine),
				),
			)
			.await?;
		tracing::info!("Created new collection: {COLLECTION_NAME}");

		Ok(())
	}

	pub async fn upsert(&self, records: Vec<(ProductRecord, Vec<f32>)>) -> Result<usize> {
		let mut points = Vec::with_capacity(records.len());
		for (record, vector) in records {
			let payload = Payload::try_from(json!({
				"id": record.id,
				"file_name": record.file_name,
				"description": record.description,
				"price": record.price,
			}))?;
			points.push(PointStruct::new(record.id, vector, payload));
		}

		let count = points.len();
		if count > 0 {
			self.client
				.upsert_points(UpsertPointsBuilder::new(COLLECTION_NAME, points))
				.await?;
		}

		Ok(count)
	}

	/// Nearest-neighbour lookup; payloads are reshaped into candidates.
	pub async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<Candidate>> {
		let response = self
			.client
			.search_points(
				SearchPointsBuilder::new(COLLECTION_NAME, vector, top_k).with_payload(true),
			)
			.await?;

		Ok(response
			.result
			.iter()
			.map(|point| Candidate::from_payload(&point.payload))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use qdrant_client::qdrant::value::Kind;

	fn string_value(s: &str) -> Value {
		Value {
			kind: Some(Kind::StringValue(s.to_string())),
		}
	}

	fn double_value(n: f64) -> Value {
		Value {
			kind: Some(Kind::DoubleValue(n)),
		}
	}

	#[test]
	fn payloads_reshape_into_candidates() {
		let payload = HashMap::from([
			("id".to_string(), string_value("abc-123")),
			("file_name".to_string(), string_value("th.jpg")),
			("description".to_string(), string_value("pink t-shirt")),
			("price".to_string(), double_value(100.0)),
		]);

		let candidate = Candidate::from_payload(&payload);
		assert_eq!(candidate.id, "abc-123");
		assert_eq!(candidate.filename, "th.jpg");
		assert_eq!(candidate.description, "pink t-shirt");
		assert!((candidate.price - 100.0).abs() < f64::EPSILON);
	}

	#[test]
	fn missing_payload_fields_fall_back() {
		let candidate = Candidate::from_payload(&HashMap::new());
		assert_eq!(candidate.id, "unknown_id");
		assert_eq!(candidate.filename, "unknown.jpg");
		assert_eq!(candidate.description, "No description");
		assert!((candidate.price - 0.0).abs() < f64::EPSILON);
	}

	#[test]
	fn candidates_serialize_with_the_documented_keys() {
		let candidate = Candidate {
			id: "abc".to_string(),
			filename: "th.jpg".to_string(),
			description: "pink t-shirt".to_string(),
			price: 100.0,
		};
		let body = serde_json::to_value(&candidate).unwrap();
		assert_eq!(
			body,
			json!({
				"id": "abc",
				"filename": "th.jpg",
				"description": "pink t-shirt",
				"price": 100.0,
			})
		);
	}
}

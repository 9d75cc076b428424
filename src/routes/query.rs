use aide::axum::{routing::post, ApiRouter};
use axum::Extension;
use axum_jsonschema::Json;
use schemars::JsonSchema;

use crate::{
	cart::{CartExtension, CartItem},
	embedder::EmbedderExtension,
	errors::HTTPError,
	llm::{CartAction, LlmExtension},
	store::{Candidate, StoreExtension, DEFAULT_TOP_K},
};

pub fn handler() -> ApiRouter {
	ApiRouter::new().api_route("/query/", post(query_images))
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
struct QueryRequest {
	query_text: String,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct QueryResponse {
	response: String,
	images: Vec<Candidate>,
	#[serde(rename = "addToCart")]
	add_to_cart: Option<Candidate>,
}

/// Answer a catalogue question, mutating the cart when asked to
async fn query_images(
	Extension(store): StoreExtension,
	Extension(embedder): EmbedderExtension,
	Extension(llm): LlmExtension,
	Extension(cart): CartExtension,
	Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, HTTPError> {
	tracing::trace!("Querying catalogue: {}", req.query_text);

	let vector = embedder.embed_text(&req.query_text)?;
	let candidates = store.search(vector, DEFAULT_TOP_K).await?;
	let top_match = candidates.first().cloned();

	// Cart commands act on the closest match.
	let action = match (intent(&req.query_text), &top_match) {
		(Some(Intent::Add), Some(candidate)) => {
			cart.write().await.add(CartItem {
				id: candidate.id.clone(),
				name: candidate.description.clone(),
				description: candidate.description.clone(),
				price: candidate.price,
				quantity: 1,
			});
			Some(CartAction::AddedToCart)
		},
		(Some(Intent::Delete), Some(candidate)) => {
			cart.write().await.delete_by_id(&candidate.id);
			Some(CartAction::DeletedFromCart)
		},
		(Some(_), None) => Some(CartAction::NoItemFound),
		(None, _) => None,
	};

	let response = llm.respond(&req.query_text, &candidates, action).await;

	Ok(Json(QueryResponse {
		response,
		images: candidates,
		add_to_cart: if action == Some(CartAction::AddedToCart) {
			top_match
		} else {
			None
		},
	}))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
	Add,
	Delete,
}

/// Cart commands are plain substring matches, as in the original assistant.
fn intent(query_text: &str) -> Option<Intent> {
	let lowered = query_text.to_lowercase();
	if lowered.contains("add to cart") {
		Some(Intent::Add)
	} else if lowered.contains("delete from cart") {
		Some(Intent::Delete)
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_commands_are_matched_anywhere_in_the_query() {
		assert_eq!(intent("please Add To Cart the pink shirt"), Some(Intent::Add));
		assert_eq!(intent("add to cart"), Some(Intent::Add));
	}

	#[test]
	fn delete_commands_need_the_full_phrase() {
		assert_eq!(intent("delete from cart the trousers"), Some(Intent::Delete));
		assert_eq!(intent("delete the trousers"), None);
	}

	#[test]
	fn plain_questions_have_no_intent() {
		assert_eq!(intent("what summer pants do you have?"), None);
	}
}

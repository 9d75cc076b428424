use anyhow::Result;
use axum::Extension;
use futures::StreamExt;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::store::Candidate;

pub type LlmExtension = Extension<Arc<LlmClient>>;

const SYSTEM_PROMPT: &str =
	"You are a helpful assistant who provides information based on the provided context.";

/// What the query route did to the cart before asking for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
	AddedToCart,
	DeletedFromCart,
	NoItemFound,
}

/// Streams chat completions from an OpenAI-compatible endpoint into a string.
pub struct LlmClient {
	http: reqwest::Client,
	url: String,
	model: String,
	api_key: String,
}

impl LlmClient {
	pub fn new(url: &str, model: &str, api_key: &str) -> Self {
		Self {
			http: reqwest::Client::new(),
			url: url.to_string(),
			model: model.to_string(),
			api_key: api_key.to_string(),
		}
	}

	pub fn extension(self) -> LlmExtension {
		Extension(Arc::new(self))
	}

	/// Phrases a reply for the retrieved candidates, falling back to canned
	/// strings when retrieval came back empty or the completion fails.
	pub async fn respond(
		&self,
		query_text: &str,
		candidates: &[Candidate],
		action: Option<CartAction>,
	) -> String {
		if candidates.is_empty() && action.is_none() {
			return "I couldn't find any relevant information.".to_string();
		}

		let prompt = build_prompt(query_text, candidates, action);
		match self.complete(&prompt).await {
			Ok(content) => content,
			Err(err) => {
				tracing::error!("Error generating response: {err:#}");
				"An error occurred while generating the response.".to_string()
			},
		}
	}

	async fn complete(&self, prompt: &str) -> Result<String> {
		let request_body = json!({
			"model": self.model,
			"messages": [
				{ "role": "system", "content": SYSTEM_PROMPT },
				{ "role": "user", "content": prompt },
			],
			"stream": true,
		});

		let response = self
			.http
			.post(&self.url)
			.header("Authorization", format!("Bearer {}", self.api_key))
			.json(&request_body)
			.send()
			.await?
			.error_for_status()?;

		let mut stream = response.bytes_stream();
		let mut pending = String::new();
		let mut content = String::new();
		while let Some(chunk) = stream.next().await {
			let chunk = chunk?;
			pending.push_str(&String::from_utf8_lossy(&chunk));
			while let Some(offset) = pending.find('\n') {
				let line = pending[..offset].trim().to_string();
				pending.drain(..=offset);
				if let Some(delta) = delta_content(&line)? {
					content.push_str(&delta);
				}
			}
		}

		Ok(content)
	}
}

/// Extracts the content delta from one SSE line, if it carries one.
fn delta_content(line: &str) -> Result<Option<String>> {
	let Some(data) = line.strip_prefix("data:") else {
		return Ok(None);
	};

	let data = data.trim();
	if data.is_empty() || data == "[DONE]" {
		return Ok(None);
	}

	let chunk: Value = serde_json::from_str(data)?;
	Ok(chunk["choices"][0]["delta"]["content"]
		.as_str()
		.map(ToString::to_string))
}

/// Assembles the prompt for the three hardcoded intents: a cart add, a
/// cart miss, and plain Q&A. Delete wording wins whenever the query asks
/// for a removal and neither of the first two applies.
pub fn build_prompt(
	query_text: &str,
	candidates: &[Candidate],
	action: Option<CartAction>,
) -> String {
	let combined = candidates
		.iter()
		.map(|candidate| candidate.description.as_str())
		.collect::<Vec<_>>()
		.join(" ");
	let lowered = query_text.to_lowercase();

	match action {
		Some(CartAction::AddedToCart) => format!(
			"Based on the information provided, {combined}, the item has been successfully added to your cart."
		),
		Some(CartAction::NoItemFound) => format!(
			"Based on the information provided, {combined}, no relevant item was found to add to your cart."
		),
		_ if lowered.contains("delete") || lowered.contains("remove") => {
			let item_description = lowered
				.replace("delete the", "")
				.replace("remove the", "")
				.trim()
				.to_string();
			format!("Delete the item with description '{item_description}' from the cart.")
		},
		_ => format!(
			"Based on the information provided, {combined}, answer the user query: {query_text}"
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(description: &str) -> Candidate {
		Candidate {
			id: "abc".to_string(),
			filename: "th.jpg".to_string(),
			description: description.to_string(),
			price: 100.0,
		}
	}

	#[test]
	fn added_to_cart_prompt_reports_success() {
		let prompt = build_prompt(
			"add to cart the pink t-shirt",
			&[candidate("pink t-shirt")],
			Some(CartAction::AddedToCart),
		);
		assert_eq!(
			prompt,
			"Based on the information provided, pink t-shirt, the item has been successfully added to your cart."
		);
	}

	#[test]
	fn cart_miss_prompt_reports_the_miss() {
		let prompt = build_prompt("add to cart a kayak", &[], Some(CartAction::NoItemFound));
		assert_eq!(
			prompt,
			"Based on the information provided, , no relevant item was found to add to your cart."
		);
	}

	#[test]
	fn delete_wording_strips_the_leading_article() {
		let prompt = build_prompt(
			"Delete the pink t-shirt",
			&[candidate("pink t-shirt")],
			Some(CartAction::DeletedFromCart),
		);
		assert_eq!(
			prompt,
			"Delete the item with description 'pink t-shirt' from the cart."
		);
	}

	#[test]
	fn remove_wording_is_treated_like_delete() {
		let prompt = build_prompt("remove the trousers", &[candidate("trousers")], None);
		assert_eq!(
			prompt,
			"Delete the item with description 'trousers' from the cart."
		);
	}

	#[test]
	fn plain_questions_get_the_qa_prompt() {
		let prompt = build_prompt(
			"what summer pants do you have?",
			&[candidate("summer pants"), candidate("black trousers")],
			None,
		);
		assert_eq!(
			prompt,
			"Based on the information provided, summer pants black trousers, answer the user query: what summer pants do you have?"
		);
	}

	#[test]
	fn sse_lines_yield_their_content_delta() {
		let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
		assert_eq!(delta_content(line).unwrap(), Some("Hel".to_string()));
	}

	#[test]
	fn done_marker_and_foreign_lines_yield_nothing() {
		assert_eq!(delta_content("data: [DONE]").unwrap(), None);
		assert_eq!(delta_content("data:").unwrap(), None);
		assert_eq!(delta_content(": keep-alive").unwrap(), None);
	}

	#[test]
	fn chunks_without_content_yield_nothing() {
		let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
		assert_eq!(delta_content(line).unwrap(), None);
	}

	#[test]
	fn malformed_chunks_are_an_error() {
		assert!(delta_content("data: {not json").is_err());
	}
}

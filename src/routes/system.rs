use aide::axum::{routing::get, ApiRouter};
use axum_jsonschema::Json;
use schemars::JsonSchema;

pub fn handler() -> ApiRouter {
	ApiRouter::new().api_route("/", get(read_root))
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct Welcome {
	message: String,
}

/// Welcome message
async fn read_root() -> Json<Welcome> {
	Json(Welcome {
		message: "Welcome to the AI Voice Assistant API".to_string(),
	})
}

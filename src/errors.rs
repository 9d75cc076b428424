use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use schemars::JsonSchema;

/// JSON error body returned by every route.
#[derive(Debug, serde::Serialize, JsonSchema)]
pub struct HTTPError {
	pub message: String,
	#[serde(skip)]
	#[schemars(skip)]
	pub status: StatusCode,
}

impl HTTPError {
	pub fn new(message: &str) -> Self {
		Self {
			message: message.to_string(),
			status: StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub const fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}
}

impl IntoResponse for HTTPError {
	fn into_response(self) -> Response {
		(self.status, Json(self)).into_response()
	}
}

impl From<anyhow::Error> for HTTPError {
	fn from(err: anyhow::Error) -> Self {
		tracing::error!("Internal error: {err:#}");
		Self::new("Internal error")
	}
}

impl aide::OperationOutput for HTTPError {
	type Inner = Self;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_internal_server_error() {
		let err = HTTPError::new("boom");
		assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(err.message, "boom");
	}

	#[test]
	fn status_can_be_overridden() {
		let err = HTTPError::new("missing").with_status(StatusCode::NOT_FOUND);
		assert_eq!(err.status, StatusCode::NOT_FOUND);
	}

	#[test]
	fn body_only_carries_the_message() {
		let err = HTTPError::new("oops").with_status(StatusCode::BAD_REQUEST);
		let body = serde_json::to_value(&err).unwrap();
		assert_eq!(body, serde_json::json!({ "message": "oops" }));
	}
}

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{routing::get, Extension, Json};

pub fn handler() -> ApiRouter {
	ApiRouter::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi(Extension(openapi): Extension<OpenApi>) -> Json<OpenApi> {
	Json(openapi)
}

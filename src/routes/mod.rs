use aide::axum::ApiRouter;

mod cart;
mod docs;
mod ingest;
mod query;
mod system;
mod voice;

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.merge(docs::handler())
		.merge(system::handler())
		.merge(ingest::handler())
		.merge(query::handler())
		.merge(voice::handler())
		.merge(cart::handler())
}

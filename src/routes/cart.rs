use aide::axum::{
	routing::{get, post},
	ApiRouter,
};
use axum::{extract::Query, Extension};
use axum_jsonschema::Json;
use schemars::JsonSchema;

use crate::cart::{CartExtension, CartItem};

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.api_route("/cart/", get(get_cart))
		.api_route("/cart/add/", post(add_to_cart))
		.api_route("/cart/delete/", post(delete_from_cart))
		.api_route("/cart/edit/", post(edit_cart_item))
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct CartResponse {
	message: String,
	cart: Vec<CartItem>,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct CartContents {
	cart: Vec<CartItem>,
}

/// List the cart
async fn get_cart(Extension(cart): CartExtension) -> Json<CartContents> {
	let cart = cart.read().await;

	Json(CartContents {
		cart: cart.items().to_vec(),
	})
}

/// Add an item to the cart
async fn add_to_cart(
	Extension(cart): CartExtension,
	Json(item): Json<CartItem>,
) -> Json<CartResponse> {
	tracing::trace!("Adding {} to the cart", item.id);

	let mut cart = cart.write().await;
	cart.add(item);

	Json(CartResponse {
		message: "Item added to cart".to_string(),
		cart: cart.items().to_vec(),
	})
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
struct DeleteParams {
	item_id: String,
}

/// Remove an item from the cart
async fn delete_from_cart(
	Extension(cart): CartExtension,
	Query(params): Query<DeleteParams>,
) -> Json<CartResponse> {
	tracing::trace!("Removing {} from the cart", params.item_id);

	let mut cart = cart.write().await;
	cart.delete_by_id(&params.item_id);

	Json(CartResponse {
		message: "Item removed from cart".to_string(),
		cart: cart.items().to_vec(),
	})
}

/// Update an item in the cart
async fn edit_cart_item(
	Extension(cart): CartExtension,
	Json(item): Json<CartItem>,
) -> Json<CartResponse> {
	tracing::trace!("Updating {} in the cart", item.id);

	let mut cart = cart.write().await;
	let message = if cart.edit(item) {
		"Item updated in cart"
	} else {
		"Item not found in cart"
	};

	Json(CartResponse {
		message: message.to_string(),
		cart: cart.items().to_vec(),
	})
}

use axum::Extension;
use schemars::JsonSchema;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type CartExtension = Extension<Arc<RwLock<Cart>>>;

const fn default_quantity() -> u32 {
	1
}

/// A single cart line. `quantity` defaults to 1 when omitted by the client.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct CartItem {
	pub id: String,
	pub name: String,
	pub description: String,
	pub price: f64,
	#[serde(default = "default_quantity")]
	pub quantity: u32,
}

/// Volatile, process-lifetime cart. Nothing here survives a restart.
#[derive(Debug, Default)]
pub struct Cart {
	items: Vec<CartItem>,
}

impl Cart {
	pub fn extension(self) -> CartExtension {
		Extension(Arc::new(RwLock::new(self)))
	}

	pub fn add(&mut self, item: CartItem) {
		self.items.push(item);
	}

	pub fn delete_by_id(&mut self, id: &str) {
		self.items.retain(|item| item.id != id);
	}

	/// Replaces the line with the same id. Returns false when no line matches.
	pub fn edit(&mut self, item: CartItem) -> bool {
		self.items
			.iter_mut()
			.find(|existing| existing.id == item.id)
			.map_or(false, |existing| {
				*existing = item;
				true
			})
	}

	pub fn items(&self) -> &[CartItem] {
		&self.items
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(id: &str, price: f64) -> CartItem {
		CartItem {
			id: id.to_string(),
			name: format!("item {id}"),
			description: format!("description {id}"),
			price,
			quantity: 1,
		}
	}

	#[test]
	fn add_appends_lines() {
		let mut cart = Cart::default();
		cart.add(item("a", 100.0));
		cart.add(item("a", 100.0));
		assert_eq!(cart.items().len(), 2);
	}

	#[test]
	fn delete_removes_every_line_with_the_id() {
		let mut cart = Cart::default();
		cart.add(item("a", 100.0));
		cart.add(item("b", 120.0));
		cart.add(item("a", 100.0));

		cart.delete_by_id("a");

		assert_eq!(cart.items().len(), 1);
		assert_eq!(cart.items()[0].id, "b");
	}

	#[test]
	fn delete_of_missing_id_is_a_noop() {
		let mut cart = Cart::default();
		cart.add(item("a", 100.0));
		cart.delete_by_id("zzz");
		assert_eq!(cart.items().len(), 1);
	}

	#[test]
	fn edit_replaces_matching_line() {
		let mut cart = Cart::default();
		cart.add(item("a", 100.0));

		let mut updated = item("a", 100.0);
		updated.quantity = 3;
		assert!(cart.edit(updated));
		assert_eq!(cart.items()[0].quantity, 3);
	}

	#[test]
	fn edit_of_missing_line_reports_not_found() {
		let mut cart = Cart::default();
		assert!(!cart.edit(item("a", 100.0)));
		assert!(cart.items().is_empty());
	}

	#[test]
	fn quantity_defaults_to_one_when_omitted() {
		let parsed: CartItem = serde_json::from_value(serde_json::json!({
			"id": "a",
			"name": "pink t-shirt",
			"description": "pink t-shirt",
			"price": 100.0,
		}))
		.unwrap();
		assert_eq!(parsed.quantity, 1);
	}
}

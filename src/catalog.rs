use schemars::JsonSchema;

/// Metadata attached to a product image at ingest time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct ProductRecord {
	pub id: String,
	pub file_name: String,
	pub description: String,
	pub price: f64,
}

pub const FALLBACK_DESCRIPTION: &str = "No description available.";

/// The demo catalogue, keyed by image file name.
const CATALOG: &[(&str, &str, f64)] = &[
	(
		"th.jpg",
		"A high-quality pink summer t-shirt, designed with a long cut and crafted from premium fabric for maximum comfort and durability. Price is $100",
		100.0,
	),
	(
		"thi.jpg",
		"A vibrant black summer t-shirt, featuring a long design and made from breathable fabric, ideal for casual outings and hot weather. Price is $100",
		100.0,
	),
	(
		"pant1.jpg",
		"A well-crafted pair of quality pants, offering a perfect fit and made from durable fabric for everyday wear and comfort. Price is $120",
		120.0,
	),
	(
		"pant.jpg",
		"Comfortable summer pants, made from elastic fabric, providing a relaxed fit and easy movement for warm weather activities. Price is $121",
		121.0,
	),
	(
		"womentshirt.jpg",
		"A stylish women t-shirt with a long cut, made from soft fabric and designed for both comfort and elegance, suitable for various occasions. Price is $140",
		140.0,
	),
	(
		"womentshirt1.jpg",
		"A blue summer t-shirt for women, featuring a long design and crafted from high-quality fabric, perfect for staying cool and fashionable. Price is $150",
		150.0,
	),
	(
		"trouser.jpg",
		"A comfortable black summer trouser, designed with a long cut and made from soft fabric, ideal for casual wear and everyday use. Price is $78",
		78.0,
	),
	(
		"trouser1.jpg",
		"A versatile blue summer trouser with a long fit, made from high-quality fabric for a stylish and comfortable look. Price is $72",
		72.0,
	),
];

/// Looks up the description and price for an image file name, falling back to
/// placeholder metadata for files outside the demo catalogue.
pub fn lookup(file_name: &str) -> (String, f64) {
	CATALOG
		.iter()
		.find(|(name, _, _)| *name == file_name)
		.map_or_else(
			|| (FALLBACK_DESCRIPTION.to_string(), 0.0),
			|(_, description, price)| ((*description).to_string(), *price),
		)
}

/// Mints a record for an uploaded image, with a fresh UUID as its id.
pub fn record_for(file_name: &str) -> ProductRecord {
	let (description, price) = lookup(file_name);

	ProductRecord {
		id: uuid::Uuid::new_v4().to_string(),
		file_name: file_name.to_string(),
		description,
		price,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_files_resolve_to_catalogue_metadata() {
		let (description, price) = lookup("trouser.jpg");
		assert!(description.contains("black summer trouser"));
		assert!((price - 78.0).abs() < f64::EPSILON);
	}

	#[test]
	fn unknown_files_fall_back_to_placeholders() {
		let (description, price) = lookup("mystery.jpg");
		assert_eq!(description, FALLBACK_DESCRIPTION);
		assert!((price - 0.0).abs() < f64::EPSILON);
	}

	#[test]
	fn records_get_distinct_ids() {
		let first = record_for("th.jpg");
		let second = record_for("th.jpg");
		assert_ne!(first.id, second.id);
		assert_eq!(first.file_name, "th.jpg");
	}
}

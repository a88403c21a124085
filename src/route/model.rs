use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::Ownable;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn ten() -> i64 {
	DEFAULT_PAGE_SIZE
}

/// Parses a page number. Non-numeric input selects the first page, and numbers
/// too large for an `i64` saturate so that they clamp to the last page.
fn parse_page(page: &str) -> i64 {
	let page = page.trim();

	if let Ok(page) = page.parse() {
		return page;
	}

	let digits = page.strip_prefix('+').unwrap_or(page);

	if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
		i64::MAX
	} else {
		one()
	}
}

/// Reads the page number without rejecting malformed input.
fn lenient_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	let page = Option::<String>::deserialize(deserializer)?;

	Ok(page.as_deref().map_or_else(one, parse_page))
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed). Out-of-range pages are clamped.
	#[serde(default = "one", deserialize_with = "lenient_page")]
	#[schemars(with = "Option<i64>")]
	pub page: i64,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub size: i64,
}

/// The resolved slice of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	pub page: i64,
	pub pages: i64,
	pub size: i64,
	pub total: i64,
}

impl Window {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}

	pub fn wrap<T>(self, items: Vec<T>) -> Page<T> {
		Page {
			items,
			page: self.page,
			pages: self.pages,
			size: self.size,
			total: self.total,
		}
	}
}

impl Paginate {
	/// Clamps the requested page to the pages that exist for `total` items.
	///
	/// An empty listing still has a single (empty) page.
	pub fn window(&self, total: i64) -> Window {
		let size = self.size.max(1);
		let pages = ((total.max(0) + size - 1) / size).max(1);

		Window {
			page: self.page.clamp(1, pages),
			pages,
			size,
			total: total.max(0),
		}
	}
}

/// A single page of a listing.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Page<T> {
	/// The items on this page.
	pub items: Vec<T>,
	/// The page number (1-indexed).
	pub page: i64,
	/// The total number of pages.
	pub pages: i64,
	/// The maximum number of items per page.
	pub size: i64,
	/// The total number of items across all pages.
	pub total: i64,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// The public face of a user, shown next to the content they wrote.
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Author {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The username that is displayed to the public.
	pub username: String,
}

/// Only the author of a row, fetched for ownership checks.
#[derive(Debug, sqlx::FromRow)]
pub struct Owner {
	pub author_id: Uuid,
}

impl Ownable for Owner {
	fn author_id(&self) -> Uuid {
		self.author_id
	}
}

#[cfg(test)]
mod test {
	use super::Paginate;

	fn paginate(page: i64, size: i64) -> Paginate {
		Paginate { page, size }
	}

	#[test]
	fn test_window_offset() {
		let window = paginate(1, 10).window(100);

		assert_eq!(window.offset(), 0);
		assert_eq!(paginate(2, 10).window(100).offset(), 10);
		assert_eq!(paginate(2, 5).window(100).offset(), 5);
		assert_eq!(paginate(3, 5).window(100).offset(), 10);
	}

	#[test]
	fn test_window_limit() {
		assert_eq!(paginate(1, 10).window(3).limit(), 10);
	}

	#[test]
	fn test_window_clamps_past_last_page() {
		let window = paginate(7, 10).window(25);

		assert_eq!(window.pages, 3);
		assert_eq!(window.page, 3);
		assert_eq!(window.offset(), 20);
	}

	#[test]
	fn test_window_clamps_below_first_page() {
		assert_eq!(paginate(0, 10).window(25).page, 1);
		assert_eq!(paginate(-4, 10).window(25).page, 1);
	}

	#[test]
	fn test_window_empty_listing_has_one_page() {
		let window = paginate(5, 10).window(0);

		assert_eq!(window.pages, 1);
		assert_eq!(window.page, 1);
		assert_eq!(window.offset(), 0);
	}

	#[test]
	fn test_window_exact_multiple() {
		assert_eq!(paginate(1, 10).window(20).pages, 2);
		assert_eq!(paginate(1, 10).window(21).pages, 3);
	}

	#[test]
	fn test_page_parsed_leniently() {
		let page = |value: serde_json::Value| {
			serde_json::from_value::<Paginate>(serde_json::json!({ "page": value }))
				.unwrap()
				.page
		};

		assert_eq!(page(serde_json::json!("3")), 3);
		assert_eq!(page(serde_json::json!("abc")), 1);
		assert_eq!(page(serde_json::json!("")), 1);
		assert_eq!(page(serde_json::json!("-")), 1);
		assert_eq!(page(serde_json::json!("12abc")), 1);
		assert_eq!(page(serde_json::Value::Null), 1);
	}

	#[test]
	fn test_oversized_page_clamps_to_last_page() {
		let page = |value: &str| {
			serde_json::from_value::<Paginate>(serde_json::json!({ "page": value, "size": 1 }))
				.unwrap()
		};

		assert_eq!(page("99999999999999999999").page, i64::MAX);
		assert_eq!(page("+99999999999999999999").page, i64::MAX);
		assert_eq!(page(" 99999999999999999999 ").window(3).page, 3);
		assert_eq!(page("-99999999999999999999").page, 1);
	}

	#[test]
	fn test_defaults() {
		let paginate = serde_json::from_value::<Paginate>(serde_json::json!({})).unwrap();

		assert_eq!(paginate.page, 1);
		assert_eq!(paginate.size, super::DEFAULT_PAGE_SIZE);
	}
}

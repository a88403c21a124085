pub use crate::route::model::{Page, Paginate};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::route::post::model::Post;

/// A group of posts on the same topic.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Category {
	pub id: Uuid,
	pub title: String,
	pub description: String,
	/// The unique, URL-safe name of the category.
	pub slug: String,
	pub is_published: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SlugInput {
	#[validate(length(min = 1, max = 64))]
	pub slug: String,
}

/// A category together with one page of its posts.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CategoryPage {
	pub category: Category,
	pub page: Page<Post>,
}

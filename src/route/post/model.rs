pub use crate::route::model::{Author, IdInput, Page, Paginate};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
	route::comment::model::Comment,
	visibility::{Ownable, Publishable},
};

#[inline]
fn yes() -> bool {
	true
}

/// The category a post is filed under.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CategorySummary {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	/// Posts in an unpublished category are only visible to their authors.
	pub is_published: bool,
}

/// The place a post is about.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LocationSummary {
	pub id: Uuid,
	pub name: String,
}

/// A single post, written by a user.
#[model(update = false)]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that wrote the post.
	#[serde(skip_deserializing)]
	pub author: Author,
	/// The title of the post.
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	/// The body of the post.
	#[validate(length(min = 1))]
	pub text: String,
	/// The scheduled publication time. A time in the future hides the post until then.
	pub pub_date: DateTime<Utc>,
	/// Whether the post is published. Unpublished posts are only visible to their author.
	#[serde(default = "yes")]
	pub is_published: bool,
	/// A link to an image shown with the post.
	#[validate(url)]
	pub image: Option<String>,
	/// The category to file the post under.
	#[serde(skip_serializing)]
	pub category_id: Option<Uuid>,
	/// The location the post is about.
	#[serde(skip_serializing)]
	pub location_id: Option<Uuid>,
	/// The category of the post, if any.
	#[serde(skip_deserializing)]
	pub category: Option<CategorySummary>,
	/// The location of the post, if it has one and it is published.
	#[serde(skip_deserializing)]
	pub location: Option<LocationSummary>,
	/// The number of comments on the post.
	#[serde(skip_deserializing)]
	pub comment_count: i64,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

/// Edits replace every field, the same way a new post is submitted.
pub type UpdatePostInput = CreatePostInput;

impl Ownable for Post {
	fn author_id(&self) -> Uuid {
		self.author.id
	}
}

impl Publishable for Post {
	fn is_published(&self) -> bool {
		self.is_published
	}

	fn pub_date(&self) -> DateTime<Utc> {
		self.pub_date
	}

	fn category_id(&self) -> Option<Uuid> {
		self.category_id
	}

	fn category_published(&self) -> Option<bool> {
		self.category.as_ref().map(|category| category.is_published)
	}
}

/// A post joined with its author, category, location and comment count.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
	pub id: Uuid,
	pub title: String,
	pub text: String,
	pub pub_date: DateTime<Utc>,
	pub is_published: bool,
	pub image: Option<String>,
	pub created_at: DateTime<Utc>,
	pub author_id: Uuid,
	pub author_username: String,
	pub category_id: Option<Uuid>,
	pub category_title: Option<String>,
	pub category_slug: Option<String>,
	pub category_is_published: Option<bool>,
	pub location_id: Option<Uuid>,
	pub location_name: Option<String>,
	pub location_is_published: Option<bool>,
	pub comment_count: i64,
}

impl From<PostRow> for Post {
	fn from(row: PostRow) -> Self {
		let category = match (row.category_id, row.category_title, row.category_slug) {
			(Some(id), Some(title), Some(slug)) => Some(CategorySummary {
				id,
				title,
				slug,
				is_published: row.category_is_published.unwrap_or(false),
			}),
			_ => None,
		};

		// Unpublished locations are not shown, but do not hide the post
		let location = match (row.location_id, row.location_name, row.location_is_published) {
			(Some(id), Some(name), Some(true)) => Some(LocationSummary { id, name }),
			_ => None,
		};

		Self {
			id: row.id,
			author: Author {
				id: row.author_id,
				username: row.author_username,
			},
			title: row.title,
			text: row.text,
			pub_date: row.pub_date,
			is_published: row.is_published,
			image: row.image,
			category_id: row.category_id,
			location_id: row.location_id,
			category,
			location,
			comment_count: row.comment_count,
			created_at: row.created_at,
		}
	}
}

/// A post together with its comments, oldest first.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostDetail {
	pub post: Post,
	pub comments: Vec<Comment>,
}

#[cfg(test)]
mod test {
	use chrono::{Duration, Utc};
	use uuid::Uuid;
	use validator::Validate;

	use super::{CreatePostInput, Post, PostRow};
	use crate::visibility::{can_view_post, Viewer};

	fn row() -> PostRow {
		PostRow {
			id: Uuid::new_v4(),
			title: "Title".into(),
			text: "Text".into(),
			pub_date: Utc::now() - Duration::hours(1),
			is_published: true,
			image: None,
			created_at: Utc::now(),
			author_id: Uuid::new_v4(),
			author_username: "author".into(),
			category_id: Some(Uuid::new_v4()),
			category_title: Some("Travel".into()),
			category_slug: Some("travel".into()),
			category_is_published: Some(false),
			location_id: Some(Uuid::new_v4()),
			location_name: Some("Moscow".into()),
			location_is_published: Some(false),
			comment_count: 2,
		}
	}

	#[test]
	fn test_row_conversion_hides_unpublished_location() {
		let post = Post::from(row());

		assert!(post.location.is_none());
		assert!(post.location_id.is_some());
		assert_eq!(post.category.map(|c| c.slug).as_deref(), Some("travel"));
	}

	#[test]
	fn test_row_visibility_follows_category() {
		let row = row();
		let author = row.author_id;
		let post = Post::from(row);
		let now = Utc::now();

		assert!(!can_view_post(&post, Viewer::Anonymous, now));
		assert!(can_view_post(&post, Viewer::User(author), now));
	}

	#[test]
	fn test_serialized_post_has_no_raw_references() {
		let value = serde_json::to_value(Post::from(row())).unwrap();

		assert!(value.get("category_id").is_none());
		assert!(value.get("location_id").is_none());
		assert_eq!(value["author"]["username"], "author");
		assert_eq!(value["comment_count"], 2);
	}

	#[test]
	fn test_create_input_defaults_to_published() {
		let input = serde_json::from_value::<CreatePostInput>(serde_json::json!({
			"title": "Hello",
			"text": "World",
			"pub_date": "2024-01-01T12:00:00Z",
		}))
		.unwrap();

		assert!(input.is_published);
		assert!(input.category_id.is_none());
		assert!(input.validate().is_ok());
	}

	#[test]
	fn test_create_input_rejects_bad_fields() {
		let input = serde_json::from_value::<CreatePostInput>(serde_json::json!({
			"title": "",
			"text": "World",
			"pub_date": "2024-01-01T12:00:00Z",
			"image": "not a url",
		}))
		.unwrap();

		let errors = input.validate().unwrap_err();
		let fields = errors.field_errors();

		assert!(fields.contains_key("title"));
		assert!(fields.contains_key("image"));
	}
}

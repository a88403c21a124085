pub use crate::route::model::{Author, IdInput};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::Ownable;

/// A comment left on a post.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The post the comment belongs to.
	#[serde(skip_deserializing)]
	pub post_id: Uuid,
	/// The user that wrote the comment.
	#[serde(skip_deserializing)]
	pub author: Author,
	/// The body of the comment.
	#[validate(length(min = 1, max = 4096))]
	pub text: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

impl Ownable for Comment {
	fn author_id(&self) -> Uuid {
		self.author.id
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
	pub id: Uuid,
	pub post_id: Uuid,
	pub author_id: Uuid,
	pub author_username: String,
	pub text: String,
	pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
	fn from(row: CommentRow) -> Self {
		Self {
			id: row.id,
			post_id: row.post_id,
			author: Author {
				id: row.author_id,
				username: row.author_username,
			},
			text: row.text,
			created_at: row.created_at,
		}
	}
}

/// Path of a single comment on a post.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The post the comment belongs to.
	pub id: Uuid,
	/// The comment itself.
	pub comment_id: Uuid,
}

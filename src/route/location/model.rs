use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

/// A place that posts can be about.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Location {
	pub id: Uuid,
	pub name: String,
	pub is_published: bool,
	pub created_at: DateTime<Utc>,
}

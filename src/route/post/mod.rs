use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod query;
pub mod route;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("post {0} belongs to another user")]
	NotAuthor(Uuid),
	#[error("unknown category {0}")]
	UnknownCategory(Uuid),
	#[error("unknown location {0}")]
	UnknownLocation(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

/// Where a viewer is sent when they are not allowed to change a post.
pub fn detail_location(post_id: Uuid) -> String {
	format!("/posts/{post_id}")
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::SEE_OTHER,
			Self::UnknownCategory(..) | Self::UnknownLocation(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.content("The post you requested does not exist.")
				.detail("post", post.to_string()),
			Self::NotAuthor(post) => error::Message::new("not_author")
				.content("Only the author of a post can change it.")
				.detail("post", post.to_string()),
			Self::UnknownCategory(category) => error::Message::new("unknown_category")
				.content("The category you selected does not exist.")
				.field("category_id")
				.detail("category", category.to_string()),
			Self::UnknownLocation(location) => error::Message::new("unknown_location")
				.content("The location you selected does not exist.")
				.field("location_id")
				.detail("location", location.to_string()),
		}
		.into_vec()
	}

	fn location(&self) -> Option<String> {
		match self {
			Self::NotAuthor(post) => Some(detail_location(*post)),
			_ => None,
		}
	}
}

/// Maps a foreign key violation on the post table to the reference that caused it.
fn map_reference_violation(error: sqlx::Error, input: &model::CreatePostInput) -> RouteError {
	match error {
		sqlx::Error::Database(ref database) => match database.constraint() {
			Some("post_category_id_fkey") => input
				.category_id
				.map_or_else(|| RouteError::from(error), |id| Error::UnknownCategory(id).into()),
			Some("post_location_id_fkey") => input
				.location_id
				.map_or_else(|| RouteError::from(error), |id| Error::UnknownLocation(id).into()),
			_ => RouteError::from(error),
		},
		error => RouteError::from(error),
	}
}

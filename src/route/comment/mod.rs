use aide::axum::{
	routing::{post_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, route::post::detail_location, AppState};

pub mod model;
pub mod query;
pub mod route;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error("comment on post {0} belongs to another user")]
	NotAuthor(Uuid),
}

pub type RouteError = error::RouteError<Error>;

/// Comment routes, relative to the posts router.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/:id/comments", post_with(add_comment, add_comment_docs))
		.api_route(
			"/:id/comments/:comment_id",
			put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::SEE_OTHER,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.content("The post you requested does not exist.")
				.detail("post", post.to_string()),
			Self::UnknownComment(comment) => error::Message::new("unknown_comment")
				.content("The comment you requested does not exist.")
				.detail("comment", comment.to_string()),
			Self::NotAuthor(post) => error::Message::new("not_author")
				.content("Only the author of a comment can change it.")
				.detail("post", post.to_string()),
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

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn comment(app: &axum_test::TestServer, post: &str, text: &str) -> String {
		let response = app
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": text }))
			.await;

		assert_eq!(response.status_code(), 200, "{}", response.text());

		response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_string()
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_non_author_delete_is_redirected(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool);

		register(&alice, "alice").await;
		register(&bob, "bob").await;

		let post = create_post(&alice, &post_body("Hello", 1)).await;
		let post = post["id"].as_str().unwrap();
		let id = comment(&alice, post, "Mine").await;

		let response = bob.delete(&format!("/posts/{post}/comments/{id}")).await;

		assert_eq!(response.status_code(), 303);
		assert_eq!(response.header("location"), format!("/posts/{post}").as_str());

		let response = bob
			.put(&format!("/posts/{post}/comments/{id}"))
			.json(&json!({ "text": "Changed" }))
			.await;

		assert_eq!(response.status_code(), 303);

		let detail = bob.get(&format!("/posts/{post}")).await.json::<serde_json::Value>();

		assert_eq!(detail["comments"].as_array().unwrap().len(), 1);
		assert_eq!(detail["comments"][0]["text"], "Mine");
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_invalid_edit_by_non_author_is_redirected(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool);

		register(&alice, "alice").await;
		register(&bob, "bob").await;

		let post = create_post(&alice, &post_body("Hello", 1)).await;
		let post = post["id"].as_str().unwrap();
		let id = comment(&alice, post, "Mine").await;

		let response = bob
			.put(&format!("/posts/{post}/comments/{id}"))
			.json(&json!({ "text": "" }))
			.await;

		assert_eq!(response.status_code(), 303);
		assert_eq!(response.header("location"), format!("/posts/{post}").as_str());

		let response = alice
			.put(&format!("/posts/{post}/comments/{id}"))
			.json(&json!({ "text": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["field"],
			"text"
		);
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_author_edits_and_deletes_comment(pool: Database) {
		let app = app(pool);

		register(&app, "alice").await;

		let post = create_post(&app, &post_body("Hello", 1)).await;
		let post = post["id"].as_str().unwrap();
		let id = comment(&app, post, "Frist").await;

		let response = app
			.put(&format!("/posts/{post}/comments/{id}"))
			.json(&json!({ "text": "First" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["text"], "First");

		let response = app
			.put(&format!("/posts/{post}/comments/{id}"))
			.json(&json!({}))
			.await;

		assert_eq!(response.json::<serde_json::Value>()["text"], "First");

		assert_eq!(
			app.delete(&format!("/posts/{post}/comments/{id}"))
				.await
				.status_code(),
			200
		);

		let detail = app.get(&format!("/posts/{post}")).await.json::<serde_json::Value>();

		assert_eq!(detail["comments"].as_array().unwrap().len(), 0);
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_comment_must_belong_to_post(pool: Database) {
		let app = app(pool);

		register(&app, "alice").await;

		let first = create_post(&app, &post_body("First", 1)).await;
		let second = create_post(&app, &post_body("Second", 2)).await;
		let first = first["id"].as_str().unwrap();
		let second = second["id"].as_str().unwrap();
		let id = comment(&app, first, "On the first post").await;

		let response = app.delete(&format!("/posts/{second}/comments/{id}")).await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"unknown_comment"
		);
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_cannot_comment_on_scheduled_post(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool);

		register(&alice, "alice").await;
		register(&bob, "bob").await;

		let post = create_post(&alice, &post_body("Later", -24)).await;
		let post = post["id"].as_str().unwrap();

		let response = bob
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": "Early" }))
			.await;

		assert_eq!(response.status_code(), 404);

		comment(&alice, post, "Note to self").await;
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_empty_comment_is_rejected(pool: Database) {
		let app = app(pool);

		register(&app, "alice").await;

		let post = create_post(&app, &post_body("Hello", 1)).await;
		let post = post["id"].as_str().unwrap();

		let response = app
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<serde_json::Value>()["success"],
			false
		);
	}
}

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown category {0}")]
	UnknownCategory(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_categories, get_categories_docs))
		.api_route("/:slug", get_with(get_category, get_category_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownCategory(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownCategory(slug) => error::Message::new("unknown_category")
				.content("The category you requested does not exist.")
				.detail("slug", slug),
		}
		.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_category_page(pool: Database) {
		let travel = category(&pool, "travel", true).await;
		category(&pool, "drafts", false).await;

		let app = app(pool);

		register(&app, "alice").await;

		let mut body = post_body("Trip", 1);
		body["category_id"] = json!(travel);

		create_post(&app, &body).await;
		create_post(&app, &post_body("Elsewhere", 1)).await;

		let categories = app.get("/categories").await.json::<serde_json::Value>();

		assert_eq!(categories.as_array().unwrap().len(), 1);
		assert_eq!(categories[0]["slug"], "travel");

		let response = app.get("/categories/travel").await;

		assert_eq!(response.status_code(), 200);

		let page = response.json::<serde_json::Value>();

		assert_eq!(page["category"]["slug"], "travel");
		assert_eq!(page["page"]["total"], 1);
		assert_eq!(page["page"]["items"][0]["title"], "Trip");
	}

	#[sqlx::test]
	#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
	async fn test_hidden_or_missing_category_is_unknown(pool: Database) {
		category(&pool, "drafts", false).await;

		let app = app(pool);

		assert_eq!(app.get("/categories/drafts").await.status_code(), 404);
		assert_eq!(app.get("/categories/missing").await.status_code(), 404);
	}
}

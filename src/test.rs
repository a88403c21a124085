//! Helpers shared by the HTTP flow tests.

pub use serde_json::json;

pub use crate::Database;

use argon2::Argon2;
use axum_test::{TestServer, TestServerConfig};
use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::AppState;

/// Starts the router on a test server that keeps the cookies it is sent,
/// so each server acts as a single logged-in browser.
pub fn app(database: Database) -> TestServer {
	let state = AppState {
		database,
		hasher: Argon2::default(),
	};

	TestServer::new_with_config(
		crate::app(state),
		TestServerConfig {
			save_cookies: true,
			..TestServerConfig::default()
		},
	)
	.unwrap()
}

/// Registers `{username}@example.com` and returns the id of the new user.
pub async fn register(app: &TestServer, username: &str) -> Uuid {
	let response = app
		.post("/auth/register")
		.json(&json!({
			"email": format!("{username}@example.com"),
			"username": username,
			"password": "hunter2hunter",
		}))
		.await;

	assert_eq!(response.status_code(), 200, "{}", response.text());

	let me = app.get("/auth/me").await.json::<Value>();

	me["id"].as_str().unwrap().parse().unwrap()
}

/// A post body published `hours_ago` hours in the past (or the future, when negative).
pub fn post_body(title: &str, hours_ago: i64) -> Value {
	json!({
		"title": title,
		"text": format!("The text of {title}."),
		"pub_date": (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
	})
}

/// Creates a post and returns its JSON representation.
pub async fn create_post(app: &TestServer, body: &Value) -> Value {
	let response = app.post("/posts").json(body).await;

	assert_eq!(response.status_code(), 200, "{}", response.text());

	response.json::<Value>()
}

/// Inserts a category directly, since categories are managed outside the API.
pub async fn category(database: &Database, slug: &str, is_published: bool) -> Uuid {
	sqlx::query_scalar(
		"INSERT INTO category (title, description, slug, is_published) VALUES ($1, $2, $1, $3) RETURNING id",
	)
	.bind(slug)
	.bind(format!("Posts about {slug}."))
	.bind(is_published)
	.fetch_one(database)
	.await
	.unwrap()
}

/// Inserts a location directly, since locations are managed outside the API.
pub async fn location(database: &Database, name: &str, is_published: bool) -> Uuid {
	sqlx::query_scalar("INSERT INTO location (name, is_published) VALUES ($1, $2) RETURNING id")
		.bind(name)
		.bind(is_published)
		.fetch_one(database)
		.await
		.unwrap()
}

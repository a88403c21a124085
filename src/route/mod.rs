use aide::axum::ApiRouter;

use crate::AppState;

pub mod auth;
pub mod category;
pub mod comment;
pub mod docs;
pub mod location;
pub mod model;
pub mod post;
pub mod profile;

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.nest("/auth", auth::routes())
		.nest("/posts", post::routes().merge(comment::routes()))
		.nest("/categories", category::routes())
		.nest("/locations", location::routes())
		.nest("/profiles", profile::routes())
		.nest("/docs", docs::routes())
}

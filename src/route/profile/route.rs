use axum::extract::State;
use chrono::Utc;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	route::{auth, post},
	visibility::{PostFilter, Scope, Viewer},
	Database,
};

use super::{model, Error, RouteError};

/// Get profile
/// Returns a user's profile and a page of their posts, newest first. Your own profile also lists your hidden posts.
#[route(tag = tag::PROFILE)]
pub async fn get_profile(
	State(database): State<Database>,
	viewer: Viewer,
	Path(path): Path<model::UsernameInput>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::ProfilePage>, RouteError> {
	let profile = sqlx::query_as::<_, auth::model::User>(r#"SELECT * FROM "user" WHERE username = $1"#)
		.bind(&path.username)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownProfile(path.username))?;

	let filter = PostFilter::new(Scope::Profile(profile.id), viewer, Utc::now());
	let page = post::query::fetch_page(&database, &filter, &paginate).await?;

	Ok(Json(model::ProfilePage { profile, page }))
}

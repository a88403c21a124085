use axum::extract::State;
use chrono::Utc;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	route::post,
	visibility::{PostFilter, Scope, Viewer},
	Database,
};

use super::{model, Error, RouteError};

/// Get all categories
/// Returns every published category, ordered by title. Use these as choices when writing a post.
#[route(tag = tag::CATEGORY)]
pub async fn get_categories(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Category>>, RouteError> {
	let categories = sqlx::query_as::<_, model::Category>(
		"SELECT * FROM category WHERE is_published ORDER BY title ASC, id ASC",
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(categories))
}

/// Get single category
/// Returns a published category along with a page of its public posts, newest first.
#[route(tag = tag::CATEGORY)]
pub async fn get_category(
	State(database): State<Database>,
	viewer: Viewer,
	Path(path): Path<model::SlugInput>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::CategoryPage>, RouteError> {
	let category = sqlx::query_as::<_, model::Category>(
		"SELECT * FROM category WHERE slug = $1 AND is_published",
	)
	.bind(&path.slug)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownCategory(path.slug))?;

	let filter = PostFilter::new(Scope::Category(category.id), viewer, Utc::now());
	let page = post::query::fetch_page(&database, &filter, &paginate).await?;

	Ok(Json(model::CategoryPage { category, page }))
}

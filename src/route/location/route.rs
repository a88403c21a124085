use axum::extract::State;
use macros::route;

use crate::{error::AppError, extract::Json, openapi::tag, Database};

use super::model;

/// Get all locations
/// Returns every published location, ordered by name. Use these as choices when writing a post.
#[route(tag = tag::LOCATION)]
pub async fn get_locations(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Location>>, AppError> {
	let locations = sqlx::query_as::<_, model::Location>(
		"SELECT * FROM location WHERE is_published ORDER BY name ASC, id ASC",
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(locations))
}

use axum::extract::State;
use chrono::Utc;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Deferred, Json, Path, Query, Session},
	openapi::tag,
	route::{comment, model::Owner},
	visibility::{can_mutate, can_view_post, PostFilter, Scope, Viewer},
	Database,
};

use super::{map_reference_violation, model, query, Error, RouteError};

/// Get all posts
/// Returns a paginated response of published posts, newest first. Scheduled posts and posts in hidden categories are left out.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	viewer: Viewer,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<model::Page<model::Post>>, RouteError> {
	let filter = PostFilter::new(Scope::All, viewer, Utc::now());
	let page = query::fetch_page(&database, &filter, &paginate).await?;

	Ok(Json(page))
}

/// Get single post
/// Returns a single post by its unique id, along with its comments. Posts that are not visible to you are reported as unknown.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	viewer: Viewer,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let post = query::fetch_post(&database, path.id)
		.await?
		.filter(|post| can_view_post(post, viewer, Utc::now()))
		.ok_or(Error::UnknownPost(path.id))?;

	let comments = comment::query::fetch_comments(&database, post.id).await?;

	Ok(Json(model::PostDetail { post, comments }))
}

/// Create post
/// Creates a new post written by the authenticated user.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let id = sqlx::query_scalar::<_, Uuid>(
		r#"
			INSERT INTO post (title, text, pub_date, is_published, image, category_id, location_id, author_id)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING id
		"#,
	)
	.bind(&input.title)
	.bind(&input.text)
	.bind(input.pub_date)
	.bind(input.is_published)
	.bind(&input.image)
	.bind(input.category_id)
	.bind(input.location_id)
	.bind(session.user.id)
	.fetch_one(&database)
	.await
	.map_err(|error| map_reference_violation(error, &input))?;

	tracing::info!(monotonic_counter.posts_created = 1_u64, post = %id, author = %session.user.id, "post created");

	let post = query::fetch_post(&database, id)
		.await?
		.ok_or(Error::UnknownPost(id))?;

	Ok(Json(post))
}

/// Update post
/// Replaces the fields of a post you wrote. Anyone else is redirected to the post instead.
#[route(tag = tag::POST, response(status = 303, description = "You are not the author of the post."))]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	body: Deferred<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	authorize(&database, &session, path.id).await?;

	let input = body.validate()?;

	sqlx::query(
		r#"
			UPDATE post
			SET
				title = $1,
				text = $2,
				pub_date = $3,
				is_published = $4,
				image = $5,
				category_id = $6,
				location_id = $7
			WHERE id = $8 AND author_id = $9
		"#,
	)
	.bind(&input.title)
	.bind(&input.text)
	.bind(input.pub_date)
	.bind(input.is_published)
	.bind(&input.image)
	.bind(input.category_id)
	.bind(input.location_id)
	.bind(path.id)
	.bind(session.user.id)
	.execute(&database)
	.await
	.map_err(|error| map_reference_violation(error, &input))?;

	let post = query::fetch_post(&database, path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	Ok(Json(post))
}

/// Delete post
/// Deletes a post you wrote, along with its comments. Anyone else is redirected to the post instead.
#[route(tag = tag::POST, response(status = 303, description = "You are not the author of the post."))]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	authorize(&database, &session, path.id).await?;

	sqlx::query("DELETE FROM post WHERE id = $1 AND author_id = $2")
		.bind(path.id)
		.bind(session.user.id)
		.execute(&database)
		.await?;

	tracing::info!(post = %path.id, author = %session.user.id, "post deleted");

	Ok(())
}

/// Succeeds only when the post exists and the session's user wrote it.
async fn authorize(database: &Database, session: &Session, post_id: Uuid) -> Result<(), RouteError> {
	let owner = sqlx::query_as::<_, Owner>("SELECT author_id FROM post WHERE id = $1")
		.bind(post_id)
		.fetch_optional(database)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	if !can_mutate(&owner, session.viewer()) {
		tracing::debug!(post = %post_id, user = %session.user.id, "soft denied post mutation");
		return Err(Error::NotAuthor(post_id).into());
	}

	Ok(())
}

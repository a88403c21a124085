use axum::extract::State;
use chrono::Utc;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Deferred, Json, Path, Session},
	openapi::tag,
	route::post,
	visibility::{can_mutate, can_view_post},
	Database,
};

use super::{model, query, Error, RouteError};

/// Comments are only reachable through a post the viewer can see.
async fn visible_post(database: &Database, session: &Session, post_id: Uuid) -> Result<(), RouteError> {
	post::query::fetch_post(database, post_id)
		.await?
		.filter(|post| can_view_post(post, session.viewer(), Utc::now()))
		.map(|_| ())
		.ok_or_else(|| Error::UnknownPost(post_id).into())
}

/// Fetches the comment for a mutation, redirecting anyone but its author.
async fn owned_comment(
	database: &Database,
	session: &Session,
	path: &model::CommentPath,
) -> Result<model::Comment, RouteError> {
	visible_post(database, session, path.id).await?;

	let comment = query::fetch_comment(database, path.id, path.comment_id)
		.await?
		.ok_or(Error::UnknownComment(path.comment_id))?;

	if !can_mutate(&comment, session.viewer()) {
		tracing::debug!(comment = %comment.id, user = %session.user.id, "soft denied comment mutation");
		return Err(Error::NotAuthor(path.id).into());
	}

	Ok(comment)
}

/// Add comment
/// Adds a comment written by the authenticated user to a post.
#[route(tag = tag::COMMENT)]
pub async fn add_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	visible_post(&database, &session, path.id).await?;

	let id = sqlx::query_scalar::<_, Uuid>(
		r#"
			INSERT INTO comment (text, post_id, author_id)
			VALUES ($1, $2, $3)
			RETURNING id
		"#,
	)
	.bind(&input.text)
	.bind(path.id)
	.bind(session.user.id)
	.fetch_one(&database)
	.await?;

	tracing::info!(monotonic_counter.comments_added = 1_u64, comment = %id, post = %path.id, author = %session.user.id, "comment added");

	let comment = query::fetch_comment(&database, path.id, id)
		.await?
		.ok_or(Error::UnknownComment(id))?;

	Ok(Json(comment))
}

/// Update comment
/// Updates a comment you wrote. Anyone else is redirected to the post instead.
#[route(tag = tag::COMMENT, response(status = 303, description = "You are not the author of the comment."))]
pub async fn update_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::CommentPath>,
	body: Deferred<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = owned_comment(&database, &session, &path).await?;
	let input = body.validate()?;

	let text = sqlx::query_scalar::<_, String>(
		r#"
			UPDATE comment
			SET text = COALESCE($1, text)
			WHERE id = $2 AND author_id = $3
			RETURNING text
		"#,
	)
	.bind(input.text)
	.bind(comment.id)
	.bind(session.user.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::Comment { text, ..comment }))
}

/// Delete comment
/// Deletes a comment you wrote. Anyone else is redirected to the post instead.
#[route(tag = tag::COMMENT, response(status = 303, description = "You are not the author of the comment."))]
pub async fn delete_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::CommentPath>,
) -> Result<(), RouteError> {
	let comment = owned_comment(&database, &session, &path).await?;

	sqlx::query("DELETE FROM comment WHERE id = $1 AND author_id = $2")
		.bind(comment.id)
		.bind(session.user.id)
		.execute(&database)
		.await?;

	tracing::info!(comment = %comment.id, post = %path.id, "comment deleted");

	Ok(())
}

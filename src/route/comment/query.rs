use uuid::Uuid;

use super::model::{Comment, CommentRow};
use crate::Database;

macro_rules! select_comment {
	() => {
		r#"
			SELECT
				cm.id, cm.post_id, cm.text, cm.created_at,
				cm.author_id, u.username AS author_username
			FROM comment cm
			JOIN "user" u ON u.id = cm.author_id
		"#
	};
}

/// Fetches every comment on the post, oldest first.
pub async fn fetch_comments(database: &Database, post_id: Uuid) -> sqlx::Result<Vec<Comment>> {
	let rows = sqlx::query_as::<_, CommentRow>(concat!(
		select_comment!(),
		"WHERE cm.post_id = $1 ORDER BY cm.created_at ASC, cm.id ASC"
	))
	.bind(post_id)
	.fetch_all(database)
	.await?;

	Ok(rows.into_iter().map(Comment::from).collect())
}

/// Fetches a single comment, provided it belongs to the post.
pub async fn fetch_comment(
	database: &Database,
	post_id: Uuid,
	comment_id: Uuid,
) -> sqlx::Result<Option<Comment>> {
	let row = sqlx::query_as::<_, CommentRow>(concat!(
		select_comment!(),
		"WHERE cm.id = $1 AND cm.post_id = $2"
	))
	.bind(comment_id)
	.bind(post_id)
	.fetch_optional(database)
	.await?;

	Ok(row.map(Comment::from))
}

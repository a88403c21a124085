//! Post queries shared by every listing.
//!
//! The listing condition is the SQL form of [`PostFilter::matches`]; the two
//! must stay in step.

use uuid::Uuid;

use super::model::{Paginate, Page, Post, PostRow};
use crate::{visibility::PostFilter, Database};

macro_rules! select_post {
	() => {
		r#"
			SELECT
				p.id, p.title, p.text, p.pub_date, p.is_published, p.image, p.created_at,
				p.author_id, u.username AS author_username,
				p.category_id, c.title AS category_title, c.slug AS category_slug,
				c.is_published AS category_is_published,
				p.location_id, l.name AS location_name, l.is_published AS location_is_published,
				(SELECT COUNT(*) FROM comment WHERE comment.post_id = p.id) AS comment_count
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			LEFT JOIN category c ON c.id = p.category_id
			LEFT JOIN location l ON l.id = p.location_id
		"#
	};
}

macro_rules! filter_posts {
	() => {
		r#"
			WHERE ($1::uuid IS NULL OR p.author_id = $1)
				AND ($2::uuid IS NULL OR p.category_id = $2)
				AND (
					NOT $3
					OR (
						p.is_published
						AND p.pub_date <= $4
						AND (p.category_id IS NULL OR c.is_published)
					)
				)
		"#
	};
}

/// Fetches a single post, regardless of who may see it.
pub async fn fetch_post(database: &Database, id: Uuid) -> sqlx::Result<Option<Post>> {
	let row = sqlx::query_as::<_, PostRow>(concat!(select_post!(), "WHERE p.id = $1"))
		.bind(id)
		.fetch_optional(database)
		.await?;

	Ok(row.map(Post::from))
}

/// Fetches one page of the posts matching the filter, newest first.
///
/// Requests past the last page are clamped to it.
pub async fn fetch_page(
	database: &Database,
	filter: &PostFilter,
	paginate: &Paginate,
) -> sqlx::Result<Page<Post>> {
	let total = sqlx::query_scalar::<_, i64>(concat!(
		r#"
			SELECT COUNT(*) FROM post p
			LEFT JOIN category c ON c.id = p.category_id
		"#,
		filter_posts!()
	))
	.bind(filter.author_id)
	.bind(filter.category_id)
	.bind(filter.public_only)
	.bind(filter.now)
	.fetch_one(database)
	.await?;

	let window = paginate.window(total);

	let posts = sqlx::query_as::<_, PostRow>(concat!(
		select_post!(),
		filter_posts!(),
		r#"
			ORDER BY p.pub_date DESC, p.created_at DESC
			LIMIT $5 OFFSET $6
		"#
	))
	.bind(filter.author_id)
	.bind(filter.category_id)
	.bind(filter.public_only)
	.bind(filter.now)
	.bind(window.limit())
	.bind(window.offset())
	.fetch_all(database)
	.await?;

	let posts = posts.into_iter().map(Post::from).collect::<Vec<_>>();

	debug_assert!(posts.iter().all(|post| filter.matches(post)));

	Ok(window.wrap(posts))
}

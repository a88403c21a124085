//! Visibility and ownership rules for posts and comments.
//!
//! Every decision takes the viewer and the current time as arguments, so the
//! rules can be evaluated against plain snapshots without a database.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The identity a decision is made for.
///
/// Anonymous viewers and authenticated non-owners are treated identically:
/// neither can see unpublished or scheduled content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Viewer {
	#[default]
	Anonymous,
	User(Uuid),
}

impl Viewer {
	pub fn id(self) -> Option<Uuid> {
		match self {
			Self::Anonymous => None,
			Self::User(id) => Some(id),
		}
	}

	/// Whether the viewer is the user with the given id.
	pub fn is(self, user_id: Uuid) -> bool {
		self.id() == Some(user_id)
	}
}

/// Content that belongs to exactly one author.
pub trait Ownable {
	fn author_id(&self) -> Uuid;
}

/// Content gated by a publication flag, a schedule and an optional category.
pub trait Publishable: Ownable {
	fn is_published(&self) -> bool;

	fn pub_date(&self) -> DateTime<Utc>;

	fn category_id(&self) -> Option<Uuid>;

	/// The published flag of the category, or `None` when there is no category.
	fn category_published(&self) -> Option<bool>;
}

/// Whether the post can be seen by someone other than its author.
pub fn is_public<P: Publishable + ?Sized>(post: &P, now: DateTime<Utc>) -> bool {
	post.is_published() && post.pub_date() <= now && post.category_published().unwrap_or(true)
}

/// Whether the viewer may read the post (and, through it, its comments).
///
/// A `false` result must be reported as "not found" so that hidden posts
/// cannot be told apart from missing ones.
pub fn can_view_post<P: Publishable + ?Sized>(post: &P, viewer: Viewer, now: DateTime<Utc>) -> bool {
	viewer.is(post.author_id()) || is_public(post, now)
}

/// Whether the viewer may edit or delete the entity.
pub fn can_mutate<E: Ownable + ?Sized>(entity: &E, viewer: Viewer) -> bool {
	viewer.is(entity.author_id())
}

/// The collection a listing is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	/// Every post.
	All,
	/// Posts in a single category.
	Category(Uuid),
	/// Posts written by a single author.
	Profile(Uuid),
}

/// A listing filter, resolved for one viewer at one point in time.
///
/// The query layer binds these fields directly, and [`PostFilter::matches`]
/// evaluates the same condition in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
	pub author_id: Option<Uuid>,
	pub category_id: Option<Uuid>,
	/// When false, unpublished and scheduled posts are included.
	pub public_only: bool,
	pub now: DateTime<Utc>,
}

impl PostFilter {
	pub fn new(scope: Scope, viewer: Viewer, now: DateTime<Utc>) -> Self {
		let (author_id, category_id) = match scope {
			Scope::All => (None, None),
			Scope::Category(category_id) => (None, Some(category_id)),
			Scope::Profile(author_id) => (Some(author_id), None),
		};

		Self {
			author_id,
			category_id,
			// Authors browsing their own profile see everything they wrote
			public_only: !matches!(scope, Scope::Profile(author_id) if viewer.is(author_id)),
			now,
		}
	}

	pub fn matches<P: Publishable + ?Sized>(&self, post: &P) -> bool {
		self.author_id.map_or(true, |id| post.author_id() == id)
			&& self.category_id.map_or(true, |id| post.category_id() == Some(id))
			&& (!self.public_only || is_public(post, self.now))
	}
}

/// Filters the posts down to the ones visible in the scope, newest first.
///
/// This is the in-memory form of `route::post::query::fetch_page`, which
/// checks its results against [`PostFilter::matches`] in debug builds.
#[cfg(test)]
pub fn list_visible_posts<P, I>(posts: I, scope: Scope, viewer: Viewer, now: DateTime<Utc>) -> Vec<P>
where
	P: Publishable,
	I: IntoIterator<Item = P>,
{
	let filter = PostFilter::new(scope, viewer, now);
	let mut posts = posts
		.into_iter()
		.filter(|post| filter.matches(post))
		.collect::<Vec<_>>();

	posts.sort_by(|a, b| b.pub_date().cmp(&a.pub_date()));
	posts
}

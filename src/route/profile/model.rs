pub use crate::route::model::{Page, Paginate};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::route::{auth::model::User, post::model::Post};

#[derive(Deserialize, Validate, JsonSchema)]
pub struct UsernameInput {
	#[validate(length(min = 1, max = 150))]
	pub username: String,
}

/// A user's public profile together with one page of their posts.
///
/// Viewing your own profile also lists your unpublished and scheduled posts.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProfilePage {
	pub profile: User,
	pub page: Page<Post>,
}

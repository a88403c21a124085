use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const CATEGORY: &str = "Category";
	pub const LOCATION: &str = "Location";
	pub const PROFILE: &str = "Profile";
}

fn tag(name: &str, description: &str) -> Tag {
	Tag {
		name: name.into(),
		description: Some(description.into()),
		..Default::default()
	}
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blogicum")
		.summary("A blog publishing platform")
		.description(include_str!("../README.md"))
		.tag(tag(tag::AUTH, "User accounts and sessions"))
		.tag(tag(tag::POST, "Writing and reading posts"))
		.tag(tag(tag::COMMENT, "Comments on posts"))
		.tag(tag(tag::CATEGORY, "Post categories"))
		.tag(tag(tag::LOCATION, "Post locations"))
		.tag(tag(tag::PROFILE, "Author profiles"))
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorBody>, _>(|res| {
			res.example(error::ErrorBody {
				success: false,
				errors: error::Message::new("unknown_post")
					.content("The post you requested does not exist.")
					.detail("post", "00000000-0000-0000-0000-000000000000")
					.into_vec(),
			})
		})
}

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Usernames appear in profile URLs, so they are limited to letters, digits and `@.+-_`.
fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username
		.chars()
		.any(|c| !c.is_ascii_alphanumeric() && !"@.+-_".contains(c))
	{
		return Err(ValidationError::new("username"));
	}

	Ok(())
}

/// A single user.
#[model(create = false)]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user's primary email address, used for logging in.
	#[serde(skip_serializing)]
	#[validate(email)]
	pub email: String,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 150), custom(function = "validate_username"))]
	pub username: String,
	/// The user's first name.
	#[validate(length(max = 150))]
	pub first_name: String,
	/// The user's last name.
	#[validate(length(max = 150))]
	pub last_name: String,
	/// The creation time of the user.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, JsonSchema, sqlx::FromRow)]
pub struct Session {
	/// The session id.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	pub user_id: Uuid,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 150), custom(function = "validate_username"))]
	pub username: String,
	#[serde(default)]
	#[validate(length(max = 150))]
	pub first_name: String,
	#[serde(default)]
	#[validate(length(max = 150))]
	pub last_name: String,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::{validate_username, UpdateUserInput};

	#[test]
	fn test_validate_username() {
		assert!(validate_username("john.smith+blog@home_1-a").is_ok());
		assert!(validate_username("john smith").is_err());
		assert!(validate_username("jöhn").is_err());
		assert!(validate_username("john/../").is_err());
	}

	#[test]
	fn test_update_input_is_partial() {
		let input = serde_json::from_value::<UpdateUserInput>(serde_json::json!({
			"first_name": "John",
		}))
		.unwrap();

		assert_eq!(input.first_name.as_deref(), Some("John"));
		assert!(input.username.is_none());
		assert!(input.validate().is_ok());
	}

	#[test]
	fn test_update_input_validates_present_fields() {
		let input = serde_json::from_value::<UpdateUserInput>(serde_json::json!({
			"username": "a b",
			"email": "not-an-email",
		}))
		.unwrap();

		let errors = input.validate().unwrap_err();
		let fields = errors.field_errors();

		assert!(fields.contains_key("username"));
		assert!(fields.contains_key("email"));
	}
}

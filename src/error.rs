use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection,
	http::{header, HeaderValue, Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single client-facing error message.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A stable, machine-readable error code.
	pub code: Cow<'a, str>,
	/// A human-readable description of the error.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional structured details about the error.
	#[serde(skip_serializing_if = "Map::is_empty")]
	pub details: Map,
}

impl<'a> Message<'a> {
	pub fn new(code: impl Into<Cow<'a, str>>) -> Self {
		let code = code.into();

		Self {
			content: code.clone(),
			code,
			field: None,
			details: Map::new(),
		}
	}

	#[must_use]
	pub fn content(mut self, content: impl Into<Cow<'a, str>>) -> Self {
		self.content = content.into();
		self
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
	pub success: bool,
	pub errors: Vec<Message<'static>>,
}

impl ErrorBody {
	fn new(errors: Vec<Message<'static>>) -> Self {
		Self {
			success: false,
			errors,
		}
	}
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn into_errors(self) -> Vec<Message<'static>>;

	/// Where the client should be sent instead of seeing an error body.
	///
	/// Only used when [`ErrorShape::status`] is a redirection.
	fn location(&self) -> Option<String> {
		None
	}
}

/// Error type for failures shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0:?}")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("body error: {0}")]
	Body(#[from] rejection::JsonRejection),
	#[error("deserialization error: {0}")]
	Deserialize(#[from] serde_json::Error),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("rate limited: {0:?}")]
	RateLimit(tower_governor::GovernorError),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..)
			| Self::Json(..)
			| Self::Body(..)
			| Self::Deserialize(..)
			| Self::Query(..)
			| Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::RateLimit(..) => StatusCode::TOO_MANY_REQUESTS,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						let content = error
							.message
							.as_ref()
							.map_or_else(|| error.code.to_string(), ToString::to_string);

						Message::new(format!("invalid_{}", error.code))
							.content(content)
							.field(field.to_string())
					})
				})
				.collect(),
			Self::Json(..) => Message::new("invalid_json")
				.content("The request body does not match the expected schema.")
				.into_vec(),
			Self::Body(error) => Message::new("invalid_json")
				.content(error.body_text())
				.into_vec(),
			Self::Deserialize(error) => Message::new("invalid_json")
				.content(error.to_string())
				.into_vec(),
			Self::Query(error) => Message::new("invalid_query")
				.content(error.body_text())
				.into_vec(),
			Self::Path(error) => Message::new("invalid_path")
				.content(error.body_text())
				.into_vec(),
			Self::RateLimit(..) => Message::new("rate_limited")
				.content("Too many requests, try again later.")
				.into_vec(),
			Self::Database(..) => Message::new("internal_error")
				.content("An internal error occurred.")
				.into_vec(),
		}
	}
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl From<tower_governor::GovernorError> for AppError {
	fn from(error: tower_governor::GovernorError) -> Self {
		Self::RateLimit(error)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if let Self::Database(ref error) = self {
			tracing::error!(%error, "database error");
		}

		(status, axum::Json(ErrorBody::new(self.into_errors()))).into_response()
	}
}

impl OperationOutput for AppError {
	type Inner = ErrorBody;
}

/// Error returned by a route: either the route's own error, or a shared [`AppError`].
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T: ErrorShape> {
	#[error(transparent)]
	Route(T),
	#[error(transparent)]
	App(AppError),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T: ErrorShape> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T: ErrorShape> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => {
				let status = error.status();

				if status.is_redirection() {
					if let Some(location) = error
						.location()
						.and_then(|location| HeaderValue::try_from(location).ok())
					{
						return (status, [(header::LOCATION, location)]).into_response();
					}
				}

				(status, axum::Json(ErrorBody::new(error.into_errors()))).into_response()
			}
			Self::App(error) => error.into_response(),
		}
	}
}

impl<T: ErrorShape> OperationOutput for RouteError<T> {
	type Inner = ErrorBody;
}

#[cfg(test)]
mod test {
	use axum::{
		http::{header, StatusCode},
		response::IntoResponse,
	};

	use super::{ErrorShape, Message, RouteError};

	#[derive(Debug, thiserror::Error)]
	enum Lookup {
		#[error("missing")]
		Missing,
		#[error("moved")]
		Moved,
	}

	impl ErrorShape for Lookup {
		fn status(&self) -> StatusCode {
			match self {
				Self::Missing => StatusCode::NOT_FOUND,
				Self::Moved => StatusCode::SEE_OTHER,
			}
		}

		fn into_errors(self) -> Vec<Message<'static>> {
			Message::new(self.to_string()).into_vec()
		}

		fn location(&self) -> Option<String> {
			match self {
				Self::Missing => None,
				Self::Moved => Some("/elsewhere".into()),
			}
		}
	}

	#[test]
	fn test_message_builder() {
		let message = Message::new("unknown_post")
			.content("The post does not exist.")
			.field("post_id")
			.detail("post", "abc");

		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value["code"], "unknown_post");
		assert_eq!(value["content"], "The post does not exist.");
		assert_eq!(value["field"], "post_id");
		assert_eq!(value["details"]["post"], "abc");
	}

	#[test]
	fn test_message_omits_empty_parts() {
		let value = serde_json::to_value(Message::new("code")).unwrap();

		assert_eq!(value["content"], "code");
		assert!(value.get("field").is_none());
		assert!(value.get("details").is_none());
	}

	#[test]
	fn test_route_error_status() {
		let response = RouteError::from(Lookup::Missing).into_response();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert!(response.headers().get(header::LOCATION).is_none());
	}

	#[test]
	fn test_route_error_redirect() {
		let response = RouteError::from(Lookup::Moved).into_response();

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(response.headers()[header::LOCATION], "/elsewhere");
	}
}

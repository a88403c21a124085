mod session;

pub use session::Session;

use std::marker::PhantomData;

use aide::{OperationInput, OperationIo};
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::de;
use validator::Validate;

use crate::error::AppError;

/// Extractor that checks a JSON body against the schema of `T` and then runs
/// its field validators.
///
/// A post title over 256 characters or an empty comment is rejected here, with
/// one [`crate::error::Message`] per offending field, before the handler runs.
///
/// ```rust
/// async fn add_comment(Json(input): Json<CreateCommentInput>) {
///   // `input.text` is between 1 and 4096 characters
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum_jsonschema::Json<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + Validate + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let input = axum_jsonschema::Json::<T>::from_request(req, state)
			.await?
			.0;

		input.validate()?;
		Ok(Self(input))
	}
}

/// A JSON body that is only read into `T` when the handler asks for it.
///
/// Edits are soft denied for anyone but the author, whatever they submit, so
/// the ownership check has to run before the body is looked at. Only a body
/// that is not JSON at all is rejected up front.
///
/// ```rust
/// async fn update_post(session: Session, body: Deferred<UpdatePostInput>) {
///   authorize(&session).await?;
///   let input = body.validate()?;
/// }
/// ```
pub struct Deferred<T> {
	value: serde_json::Value,
	input: PhantomData<fn() -> T>,
}

impl<T> Deferred<T>
where
	T: de::DeserializeOwned + Validate,
{
	/// Reads the body into `T` and runs its field validators.
	pub fn validate(self) -> Result<T, AppError> {
		let input = serde_json::from_value::<T>(self.value)?;

		input.validate()?;
		Ok(input)
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Deferred<T>
where
	T: 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum::Json(value) = axum::Json::<serde_json::Value>::from_request(req, state).await?;

		Ok(Self {
			value,
			input: PhantomData,
		})
	}
}

impl<T> OperationInput for Deferred<T>
where
	T: JsonSchema,
{
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		axum_jsonschema::Json::<T>::operation_input(ctx, operation);
	}
}

/// Extractor that deserializes a query string and validates it.
///
/// Listings take their [`Paginate`](crate::route::model::Paginate) this way, so
/// a page size outside `1..=100` is rejected before any query runs.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let query = axum::extract::Query::<T>::from_request_parts(parts, state)
			.await?
			.0;

		query.validate()?;
		Ok(Self(query))
	}
}

/// Extractor that deserializes path parameters and validates them.
///
/// A malformed post or comment id becomes an `invalid_path` error, and a
/// category slug or username over its length limit fails validation.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let path = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await?
			.0;

		path.validate()?;
		Ok(Self(path))
	}
}

#[cfg(test)]
mod test {
	use std::marker::PhantomData;

	use serde_json::json;

	use super::Deferred;
	use crate::{
		error::AppError,
		route::{comment::model::UpdateCommentInput, post::model::UpdatePostInput},
	};

	fn deferred<T>(value: serde_json::Value) -> Deferred<T> {
		Deferred {
			value,
			input: PhantomData,
		}
	}

	#[test]
	fn test_deferred_runs_field_validators() {
		let error = deferred::<UpdateCommentInput>(json!({ "text": "" }))
			.validate()
			.unwrap_err();

		let AppError::Validation(errors) = error else {
			panic!("expected a validation error, got {error:?}");
		};

		assert!(errors.field_errors().contains_key("text"));
	}

	#[test]
	fn test_deferred_rejects_missing_fields() {
		let error = deferred::<UpdatePostInput>(json!({})).validate().unwrap_err();

		assert!(matches!(error, AppError::Deserialize(..)));
	}

	#[test]
	fn test_deferred_accepts_valid_body() {
		let input = deferred::<UpdatePostInput>(json!({
			"title": "Hello",
			"text": "World",
			"pub_date": "2024-01-01T12:00:00Z",
		}))
		.validate()
		.unwrap();

		assert_eq!(input.title, "Hello");
	}
}

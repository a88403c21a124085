use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/", get_with(route::get_locations, route::get_locations_docs))
}

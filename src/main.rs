#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
#[cfg(test)]
mod test;
mod trace;
mod visibility;

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{Extension, Router};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;

/// The shared application state.
///
/// Handlers extract the parts they need through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
	#[error("failed to connect to the database: {0}")]
	Database(#[from] sqlx::Error),
	#[error("failed to run migrations: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("invalid rate limiting quota")]
	RateLimit,
	#[error("failed to bind to {0}: {1}")]
	Bind(SocketAddr, std::io::Error),
	#[error("server error: {0}")]
	Serve(std::io::Error),
}

/// Builds the router with every route, the API documentation and the HTTP middleware.
pub fn app(state: AppState) -> Router {
	let mut api = OpenApi::default();

	aide::gen::extract_schemas(true);

	route::routes()
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}

async fn run(config: config::Config) -> Result<(), StartupError> {
	let database = PgPoolOptions::new().connect(&config.database_url).await?;

	sqlx::migrate!().run(&database).await?;

	let state = AppState {
		database,
		hasher: Argon2::default(),
	};

	let mut app = app(state);

	if config.rate_limit {
		let limits = ratelimit::default().ok_or(StartupError::RateLimit)?;

		ratelimit::cleanup_old_limits(&[&limits]);
		app = app.layer(tower_governor::GovernorLayer { config: limits });
	}

	let address = SocketAddr::new(config.host, config.port);
	let listener = tokio::net::TcpListener::bind(address)
		.await
		.map_err(|error| StartupError::Bind(address, error))?;

	tracing::info!(%address, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await
	.map_err(StartupError::Serve)
}

#[tokio::main]
async fn main() -> ExitCode {
	dotenvy::dotenv().ok();

	let config = match config::Config::from_env() {
		Ok(config) => config,
		Err(error) => {
			eprintln!("{error}");
			return ExitCode::FAILURE;
		}
	};

	let _guard = match trace::init(config.log_level, config.otlp_endpoint.as_deref()) {
		Ok(guard) => guard,
		Err(error) => {
			eprintln!("{error}");
			return ExitCode::FAILURE;
		}
	};

	match run(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!(%error, "fatal error");
			ExitCode::FAILURE
		}
	}
}

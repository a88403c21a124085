use std::{net::IpAddr, str::FromStr};

use tracing::Level;

/// An error that can occur while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	pub log_level: Level,
	pub rate_limit: bool,
	/// The OTLP collector endpoint. OpenTelemetry export is disabled when unset.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which returns the value of a variable if it is set.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		Ok(Self {
			database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
			host: parse(&lookup, "HOST")?.unwrap_or(IpAddr::from([127, 0, 0, 1])),
			port: parse(&lookup, "PORT")?.unwrap_or(3000),
			log_level: parse(&lookup, "LOG_LEVEL")?.unwrap_or(Level::INFO),
			rate_limit: parse_flag(&lookup, "RATE_LIMIT")?.unwrap_or(true),
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|value| !value.is_empty()),
		})
	}
}

fn parse<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	lookup(name)
		.map(|value| {
			value
				.trim()
				.parse()
				.map_err(|_| ConfigError::Invalid { name, value })
		})
		.transpose()
}

fn parse_flag<F>(lookup: &F, name: &'static str) -> Result<Option<bool>, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	lookup(name)
		.map(|value| match value.trim().to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" | "on" => Ok(true),
			"0" | "false" | "no" | "off" => Ok(false),
			_ => Err(ConfigError::Invalid { name, value }),
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use tracing::Level;

	use super::{Config, ConfigError};

	fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
		let vars = vars
			.iter()
			.map(|(name, value)| ((*name).to_string(), (*value).to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[("DATABASE_URL", "postgres://localhost/blog")]).unwrap();

		assert_eq!(config.database_url, "postgres://localhost/blog");
		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.port, 3000);
		assert_eq!(config.log_level, Level::INFO);
		assert!(config.rate_limit);
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_database_url_is_required() {
		assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("DATABASE_URL", "postgres://db/blog"),
			("HOST", "0.0.0.0"),
			("PORT", "8080"),
			("LOG_LEVEL", "debug"),
			("RATE_LIMIT", "off"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
		])
		.unwrap();

		assert_eq!(config.host.to_string(), "0.0.0.0");
		assert_eq!(config.port, 8080);
		assert_eq!(config.log_level, Level::DEBUG);
		assert!(!config.rate_limit);
		assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
	}

	#[test]
	fn test_invalid_value_names_variable() {
		let error = config(&[("DATABASE_URL", "postgres://db/blog"), ("PORT", "eighty")]).unwrap_err();

		assert!(matches!(error, ConfigError::Invalid { name: "PORT", .. }));
		assert_eq!(error.to_string(), r#"PORT has an invalid value "eighty""#);
	}

	#[test]
	fn test_empty_otlp_endpoint_disables_export() {
		let config = config(&[("DATABASE_URL", "postgres://db/blog"), ("OTEL_EXPORTER_OTLP_ENDPOINT", "")]).unwrap();

		assert!(config.otlp_endpoint.is_none());
	}
}

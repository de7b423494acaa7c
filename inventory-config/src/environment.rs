use std::fmt;
use std::io;
use std::str::FromStr;

/// Environment variable that selects the runtime environment.
pub const APP_ENVIRONMENT_ENV_NAME: &str = "APP_ENVIRONMENT";

/// The runtime environment a service runs in.
///
/// Selects which environment-specific configuration file is layered on top
/// of the base configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Reads the environment from `APP_ENVIRONMENT`.
    pub fn load() -> io::Result<Self> {
        let raw = std::env::var(APP_ENVIRONMENT_ENV_NAME).map_err(|_| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("the `{APP_ENVIRONMENT_ENV_NAME}` environment variable is not set"),
            )
        })?;

        raw.parse()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("{err}")))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a known environment (expected one of: dev, staging, prod)")]
pub struct ParseEnvironmentError(String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            other => Err(ParseEnvironmentError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_environments() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!(
            "Staging".parse::<Environment>().unwrap(),
            Environment::Staging
        );
    }

    #[test]
    fn rejects_unknown_environment() {
        assert!("production".parse::<Environment>().is_err());
    }
}

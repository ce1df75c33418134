//! Structured logging setup for the binaries.

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::LoggingError;

/// Installs a compact fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str, ansi: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|source| LoggingError::Filter { level: default_level.to_owned(), source })?;

    fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .finish()
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = init_logging("plant_doctor=loud", false).unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
        assert!(err.to_string().starts_with("invalid log filter 'plant_doctor=loud'"));
    }
}

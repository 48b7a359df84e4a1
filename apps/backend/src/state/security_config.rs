use std::fmt;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::auth::claims::TokenKind;
use crate::AppError;

pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Signing secret, algorithm and token lifetimes.
///
/// Built once at startup and handed to `AppState`; token code never reads
/// the environment itself.
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl SecurityConfig {
    /// HS256 with the default TTLs.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: ACCESS_TOKEN_TTL,
            refresh_ttl: REFRESH_TOKEN_TTL,
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Read `SECRET_KEY` (required) and the optional `ACCESS_TOKEN_TTL_SECS` /
    /// `REFRESH_TOKEN_TTL_SECS` overrides.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("SECRET_KEY").unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(AppError::config("SECRET_KEY must be set"));
        }

        let access_ttl = ttl_from_env("ACCESS_TOKEN_TTL_SECS", ACCESS_TOKEN_TTL)?;
        let refresh_ttl = ttl_from_env("REFRESH_TOKEN_TTL_SECS", REFRESH_TOKEN_TTL)?;

        Ok(Self::new(secret.into_bytes()).with_ttls(access_ttl, refresh_ttl))
    }
}

fn ttl_from_env(name: &str, default: Duration) -> Result<Duration, AppError> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(AppError::config(format!(
                "{name} must be a positive number of seconds"
            ))),
        },
        Err(_) => Ok(default),
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        env::remove_var("SECRET_KEY");
        env::remove_var("ACCESS_TOKEN_TTL_SECS");
        env::remove_var("REFRESH_TOKEN_TTL_SECS");
    }

    #[test]
    #[serial]
    fn missing_secret_is_a_config_error() {
        clear_env();
        let err = SecurityConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));

        env::set_var("SECRET_KEY", "   ");
        assert!(SecurityConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn defaults_apply_when_ttls_unset() {
        clear_env();
        env::set_var("SECRET_KEY", "s3cret");

        let cfg = SecurityConfig::from_env().unwrap();
        assert_eq!(cfg.jwt_secret, b"s3cret".to_vec());
        assert_eq!(cfg.algorithm, Algorithm::HS256);
        assert_eq!(cfg.ttl_for(TokenKind::Access), Duration::from_secs(900));
        assert_eq!(cfg.ttl_for(TokenKind::Refresh), Duration::from_secs(2_592_000));
        clear_env();
    }

    #[test]
    #[serial]
    fn ttl_overrides_are_parsed() {
        clear_env();
        env::set_var("SECRET_KEY", "s3cret");
        env::set_var("ACCESS_TOKEN_TTL_SECS", "60");
        env::set_var("REFRESH_TOKEN_TTL_SECS", "120");

        let cfg = SecurityConfig::from_env().unwrap();
        assert_eq!(cfg.access_ttl, Duration::from_secs(60));
        assert_eq!(cfg.refresh_ttl, Duration::from_secs(120));

        env::set_var("ACCESS_TOKEN_TTL_SECS", "soon");
        assert!(SecurityConfig::from_env().is_err());

        env::set_var("ACCESS_TOKEN_TTL_SECS", "0");
        assert!(SecurityConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = SecurityConfig::new(b"super-secret".to_vec());
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

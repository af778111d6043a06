use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Finder timeout is not 0
/// - An enabled Pirate Bay backend has an OMDb client to resolve titles
/// - OMDb API key is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.finder.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "finder.timeout_ms cannot be 0".to_string(),
        ));
    }

    if let Some(omdb) = &config.omdb {
        if omdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "omdb.api_key cannot be empty".to_string(),
            ));
        }
    }

    if let Some(tpb) = &config.pirate_bay {
        if tpb.enabled && config.omdb.is_none() {
            return Err(ConfigError::ValidationError(
                "pirate_bay requires an [omdb] section for title lookups".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FinderConfig, PirateBayConfig, ServerConfig};
    use crate::meta::OmdbConfig;
    use std::net::IpAddr;

    fn omdb() -> OmdbConfig {
        OmdbConfig {
            api_key: "key".to_string(),
            url: "https://www.omdbapi.com/".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            finder: FinderConfig { timeout_ms: 0 },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_pirate_bay_requires_omdb() {
        let config = Config {
            pirate_bay: Some(PirateBayConfig::default()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            pirate_bay: Some(PirateBayConfig::default()),
            omdb: Some(omdb()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_disabled_pirate_bay_without_omdb() {
        let config = Config {
            pirate_bay: Some(PirateBayConfig {
                enabled: false,
                ..PirateBayConfig::default()
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_omdb_key_fails() {
        let config = Config {
            omdb: Some(OmdbConfig {
                api_key: "  ".to_string(),
                ..omdb()
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}

use std::net::SocketAddr;

use url::Url;

use crate::config::models::{ProxyConfig, ResolverConfig};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Proxy configuration validator
pub struct ProxyConfigValidator;

impl ProxyConfigValidator {
    /// Validate the entire proxy configuration
    pub fn validate(config: &ProxyConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if config.listen_addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidListenAddress {
                address: config.listen_addr.clone(),
                reason: "Must be in format 'IP:PORT' (e.g., '127.0.0.1:3000' or '0.0.0.0:8080')"
                    .to_string(),
            });
        }

        if !config.chat_path.starts_with('/') {
            errors.push(ValidationError::InvalidField {
                field: "chat_path".to_string(),
                message: "Must start with '/'".to_string(),
            });
        }

        if config.upstream.timeout_secs == 0 {
            errors.push(ValidationError::InvalidField {
                field: "upstream.timeout_secs".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        Self::validate_resolver(&config.resolver, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    fn validate_resolver(resolver: &ResolverConfig, errors: &mut Vec<ValidationError>) {
        match resolver {
            ResolverConfig::Fixed { host, port, .. } => {
                if host.is_empty() {
                    errors.push(ValidationError::InvalidField {
                        field: "resolver.host".to_string(),
                        message: "Must not be empty".to_string(),
                    });
                }
                if *port == 0 {
                    errors.push(ValidationError::InvalidField {
                        field: "resolver.port".to_string(),
                        message: "Must be greater than zero".to_string(),
                    });
                }
            }
            ResolverConfig::Registry {
                endpoint,
                service,
                timeout_secs,
                ..
            } => {
                match Url::parse(endpoint) {
                    Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                    Ok(url) => errors.push(ValidationError::InvalidField {
                        field: "resolver.endpoint".to_string(),
                        message: format!("Unsupported scheme '{}'", url.scheme()),
                    }),
                    Err(e) => errors.push(ValidationError::InvalidField {
                        field: "resolver.endpoint".to_string(),
                        message: format!("Not a valid URL: {e}"),
                    }),
                }
                if service.is_empty() {
                    errors.push(ValidationError::InvalidField {
                        field: "resolver.service".to_string(),
                        message: "Must not be empty".to_string(),
                    });
                }
                if *timeout_secs == 0 {
                    errors.push(ValidationError::InvalidField {
                        field: "resolver.timeout_secs".to_string(),
                        message: "Must be greater than zero".to_string(),
                    });
                }
            }
        }
    }

    /// Format multiple validation errors into a single readable message
    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        let messages: Vec<String> = errors.iter().map(|e| format!("  • {e}")).collect();
        format!(
            "Found {} validation error(s):\n{}",
            errors.len(),
            messages.join("\n")
        )
    }
}

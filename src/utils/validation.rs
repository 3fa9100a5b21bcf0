use crate::utils::error::{BoardError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str, allowed_schemes: &[&str]) -> Result<()> {
    if url_str.is_empty() {
        return Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => {
            if allowed_schemes.contains(&url.scheme()) {
                Ok(())
            } else {
                Err(BoardError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: url_str.to_string(),
                    reason: format!(
                        "Unsupported URL scheme: {}. Allowed schemes: {}",
                        url.scheme(),
                        allowed_schemes.join(", ")
                    ),
                })
            }
        }
        Err(e) => Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 兩個埠都為 0 時視為臨時綁定（測試用）
pub fn validate_ports(http_port: u16, ws_port: u16) -> Result<()> {
    if http_port == 0 && ws_port == 0 {
        return Ok(());
    }

    for (field, port) in [("server.http_port", http_port), ("server.ws_port", ws_port)] {
        if port == 0 {
            return Err(BoardError::InvalidConfigValueError {
                field: field.to_string(),
                value: port.to_string(),
                reason: "Port must be non-zero".to_string(),
            });
        }
    }

    if http_port == ws_port {
        return Err(BoardError::InvalidConfigValueError {
            field: "server.ws_port".to_string(),
            value: ws_port.to_string(),
            reason: "HTTP and WebSocket ports must differ".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        let ws = &["ws", "wss"];
        assert!(validate_url("relay.url", "ws://localhost:6000", ws).is_ok());
        assert!(validate_url("relay.url", "wss://example.com/feed", ws).is_ok());
        assert!(validate_url("relay.url", "", ws).is_err());
        assert!(validate_url("relay.url", "invalid-url", ws).is_err());
        assert!(validate_url("relay.url", "http://localhost:6000", ws).is_err());
    }

    #[test]
    fn test_validate_ports() {
        assert!(validate_ports(3000, 6000).is_ok());
        assert!(validate_ports(0, 0).is_ok());
        assert!(validate_ports(3000, 3000).is_err());
        assert!(validate_ports(0, 6000).is_err());
        assert!(validate_ports(3000, 0).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("paths.root_dir", "/app").is_ok());
        assert!(validate_path("paths.root_dir", "").is_err());
        assert!(validate_path("paths.root_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("relay.timeout_ms", 2000, 1).is_ok());
        assert!(validate_positive_number("relay.timeout_ms", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("server.host", "0.0.0.0").is_ok());
        assert!(validate_non_empty_string("server.host", "   ").is_err());
    }
}

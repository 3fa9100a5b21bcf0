use crate::core::{MessageForm, Result};
use crate::utils::error::BoardError;

pub const INVALID_FORM_DATA: &str = "Invalid form data";

/// Decodes an `application/x-www-form-urlencoded` body. The first
/// occurrence of each field wins.
pub fn parse_form(body: &[u8]) -> MessageForm {
    let mut form = MessageForm::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        let slot = match key.as_ref() {
            "username" => &mut form.username,
            "message" => &mut form.message,
            _ => continue,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.into_owned());
        }
    }
    form
}

fn required(value: &Option<String>) -> Result<&str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BoardError::ValidationError {
            message: INVALID_FORM_DATA.to_string(),
        })
}

/// Returns `(username, message)` when both are present and not blank.
pub fn require_fields(form: &MessageForm) -> Result<(&str, &str)> {
    Ok((required(&form.username)?, required(&form.message)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_decodes_fields() {
        let form = parse_form(b"username=Ann+Lee&message=Hello%2C+%E4%B8%96%E7%95%8C&extra=1");
        assert_eq!(form.username.as_deref(), Some("Ann Lee"));
        assert_eq!(form.message.as_deref(), Some("Hello, 世界"));
    }

    #[test]
    fn test_first_non_empty_value_wins() {
        let form = parse_form(b"username=&username=bob&username=carol&message=hi");
        assert_eq!(form.username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_require_fields() {
        let ok = parse_form(b"username=bob&message=hi");
        assert_eq!(require_fields(&ok).unwrap(), ("bob", "hi"));

        for body in [&b"username=bob"[..], b"message=hi", b"username=+&message=hi", b""] {
            let err = require_fields(&parse_form(body)).unwrap_err();
            assert_eq!(err.to_string(), "Validation error: Invalid form data");
        }
    }
}

//! Raw credentials carried by an inbound request.

/// Cookie that carries the session key.
pub const SESSION_COOKIE_NAME: &str = "auth";
/// Header checked when the cookie is absent or empty.
pub const SESSION_HEADER_NAME: &str = "x-session-token";

/// Session key candidates as extracted by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    pub cookie: Option<String>,
    pub header: Option<String>,
}

impl RequestCredentials {
    pub fn from_cookie(value: impl Into<String>) -> Self {
        Self {
            cookie: Some(value.into()),
            header: None,
        }
    }

    pub fn from_header(value: impl Into<String>) -> Self {
        Self {
            cookie: None,
            header: Some(value.into()),
        }
    }

    /// Reads the session cookie and header through the transport's lookups.
    ///
    /// `cookie` is asked for `SESSION_COOKIE_NAME`, `header` for
    /// `SESSION_HEADER_NAME`.
    pub fn extract<C, H>(cookie: C, header: H) -> Self
    where
        C: Fn(&str) -> Option<String>,
        H: Fn(&str) -> Option<String>,
    {
        Self {
            cookie: cookie(SESSION_COOKIE_NAME),
            header: header(SESSION_HEADER_NAME),
        }
    }

    /// First non-empty key: the cookie, then the header.
    pub fn session_key(&self) -> Option<&str> {
        [self.cookie.as_deref(), self.header.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestCredentials, SESSION_COOKIE_NAME, SESSION_HEADER_NAME};
    use std::collections::HashMap;

    #[test]
    fn cookie_wins_over_header() {
        let credentials = RequestCredentials {
            cookie: Some("from-cookie".to_string()),
            header: Some("from-header".to_string()),
        };
        assert_eq!(credentials.session_key(), Some("from-cookie"));
    }

    #[test]
    fn empty_cookie_falls_back_to_header() {
        let credentials = RequestCredentials {
            cookie: Some(String::new()),
            header: Some("from-header".to_string()),
        };
        assert_eq!(credentials.session_key(), Some("from-header"));
    }

    #[test]
    fn extract_reads_named_cookie_and_header() {
        let cookies = HashMap::from([("theme".to_string(), "dark".to_string())]);
        let headers = HashMap::from([("x-session-token".to_string(), "abc".to_string())]);

        let credentials = RequestCredentials::extract(
            |name| cookies.get(name).cloned(),
            |name| headers.get(name).cloned(),
        );
        assert_eq!(credentials.cookie, None);
        assert_eq!(credentials.session_key(), Some("abc"));

        let cookies = HashMap::from([(SESSION_COOKIE_NAME.to_string(), "from-cookie".to_string())]);
        let credentials = RequestCredentials::extract(
            |name| cookies.get(name).cloned(),
            |name| headers.get(name).cloned(),
        );
        assert_eq!(credentials.session_key(), Some("from-cookie"));
        assert_eq!(SESSION_HEADER_NAME, "x-session-token");
    }

    #[test]
    fn no_values_yields_none() {
        assert_eq!(RequestCredentials::default().session_key(), None);
        assert_eq!(RequestCredentials::from_header("").session_key(), None);
    }
}

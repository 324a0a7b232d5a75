//! The `#id_token=...&access_token=...` fragment an implicit-flow login returns with

use url::Url;
use url::form_urlencoded;

/// Parameters the provider appends to the redirect URI's fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFragment {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenFragment {
    /// Parse a fragment, with or without its leading `#`
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut parsed = Self::default();

        for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "id_token" => parsed.id_token = Some(value),
                "access_token" => parsed.access_token = Some(value),
                "token_type" => parsed.token_type = Some(value),
                "expires_in" => parsed.expires_in = value.parse().ok(),
                "scope" => parsed.scope = Some(value),
                "state" => parsed.state = Some(value),
                "error" => parsed.error = Some(value),
                "error_description" => parsed.error_description = Some(value),
                _ => {}
            }
        }

        parsed
    }

    /// Parse the fragment of a full URL; `None` when the URL has no fragment
    pub fn from_url(url: &Url) -> Option<Self> {
        url.fragment().map(Self::parse)
    }

    /// Build the fragment handed to a fragment login after a direct-credential exchange
    pub fn encode(id_token: &str, access_token: &str, expires_in: Option<i64>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::from("#"));
        serializer
            .append_pair("id_token", id_token)
            .append_pair("access_token", access_token);
        if let Some(expires_in) = expires_in {
            serializer.append_pair("expires_in", &expires_in.to_string());
        }
        serializer.finish()
    }

    /// Whether the provider returned tokens
    pub fn has_tokens(&self) -> bool {
        self.id_token.is_some() || self.access_token.is_some()
    }

    /// Error reported by the provider, with its description when given
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| match &self.error_description {
            Some(description) => format!("{error}: {description}"),
            None => error.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_implicit_flow_fragment() {
        let fragment = TokenFragment::parse(
            "#id_token=eyJ.a.b&access_token=eyJ.c.d&token_type=Bearer&expires_in=3600\
             &scope=openid+profile&state=s-1",
        );

        assert_eq!(fragment.id_token.as_deref(), Some("eyJ.a.b"));
        assert_eq!(fragment.access_token.as_deref(), Some("eyJ.c.d"));
        assert_eq!(fragment.expires_in, Some(3600));
        assert_eq!(fragment.scope.as_deref(), Some("openid profile"));
        assert_eq!(fragment.state.as_deref(), Some("s-1"));
        assert!(fragment.has_tokens());
    }

    #[test]
    fn test_parse_error_fragment() {
        let fragment =
            TokenFragment::parse("error=login_required&error_description=The+user+is+not+logged+in");

        assert!(!fragment.has_tokens());
        assert_eq!(
            fragment.error_message().as_deref(),
            Some("login_required: The user is not logged in")
        );
    }

    #[test]
    fn test_encode_escapes_values() {
        let encoded = TokenFragment::encode("a+b/c=", "d&e", None);
        assert!(encoded.starts_with('#'));

        let parsed = TokenFragment::parse(&encoded);
        assert_eq!(parsed.id_token.as_deref(), Some("a+b/c="));
        assert_eq!(parsed.access_token.as_deref(), Some("d&e"));
    }

    #[test]
    fn test_from_url_without_fragment() {
        let url = Url::parse("http://localhost:4200/home").unwrap();
        assert!(TokenFragment::from_url(&url).is_none());
    }
}

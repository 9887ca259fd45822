use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Body of a successful `oauth/access_token` exchange.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TokenResponse {
    /// Access token
    pub access_token: String,
    /// Profile of the user who authorized the app
    #[serde(default)]
    pub user: Option<Value>,
}

impl TokenResponse {
    pub(crate) fn from_body(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| Error::invalid_response(format!("malformed token response: {}", e)))
    }
}

/// The authenticated user's token and profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    access_token: String,
    user: Option<Value>,
}

impl Session {
    pub fn new<T: Into<String>>(access_token: T) -> Self {
        Session {
            access_token: access_token.into(),
            user: None,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            access_token: token.access_token,
            user: token.user,
        }
    }
}

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::{App, Error, Result, API_AUTH_PATH};

/// A permission requested during authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Basic,
    PublicContent,
    FollowerList,
    Comments,
    Relationships,
    Likes,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Basic,
        Scope::PublicContent,
        Scope::FollowerList,
        Scope::Comments,
        Scope::Relationships,
        Scope::Likes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Basic => "basic",
            Scope::PublicContent => "public_content",
            Scope::FollowerList => "follower_list",
            Scope::Comments => "comments",
            Scope::Relationships => "relationships",
            Scope::Likes => "likes",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::Request(format!("invalid scope permission: {}", s)))
    }
}

/// Parse raw scope names, rejecting unknown ones.
pub fn parse_scopes<S: AsRef<str>>(scopes: &[S]) -> Result<Vec<Scope>> {
    scopes.iter().map(|s| s.as_ref().parse()).collect()
}

/// Authorization URL for the browser redirect.
#[derive(Debug, Clone)]
pub struct LoginUrl<'a> {
    app: &'a App,
    callback: &'a str,
    state: &'a str,
    scopes: &'a [Scope],
}

impl<'a> LoginUrl<'a> {
    pub fn new(app: &'a App, callback: &'a str, state: &'a str, scopes: &'a [Scope]) -> Self {
        LoginUrl {
            app,
            callback,
            state,
            scopes,
        }
    }

    /// Build the URL against `api_host` (which ends with `/`).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] when no scope is given.
    pub fn build(&self, api_host: &str) -> Result<String> {
        if self.scopes.is_empty() {
            return Err(Error::Request(
                "missing or invalid scope permission".to_string(),
            ));
        }
        let scope = self
            .scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", self.app.id())
            .append_pair("redirect_uri", self.callback)
            .append_pair("response_type", "code")
            .append_pair("state", self.state)
            .append_pair("scope", &scope)
            .finish();

        Ok(format!("{}{}?{}", api_host, API_AUTH_PATH, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, API_HOST};

    #[test]
    fn login_url_single_scope() {
        let app = App::new("ID1", "secret").unwrap();
        let url = LoginUrl::new(&app, "https://cb", "S1", &[Scope::Basic])
            .build(API_HOST)
            .unwrap();
        assert_eq!(
            url,
            "https://api.instagram.com/oauth/authorize?client_id=ID1&redirect_uri=https%3A%2F%2Fcb&response_type=code&state=S1&scope=basic"
        );
    }

    #[test]
    fn login_url_joins_scopes_with_space() {
        let app = App::new("ID1", "secret").unwrap();
        let scopes = [Scope::Basic, Scope::Likes, Scope::Comments];
        let url = LoginUrl::new(&app, "https://cb/path?x=1", "S1", &scopes)
            .build(API_HOST)
            .unwrap();
        assert!(url.ends_with("&scope=basic+likes+comments"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fcb%2Fpath%3Fx%3D1&"));
    }

    #[test]
    fn login_url_requires_scope() {
        let app = App::new("ID1", "secret").unwrap();
        let err = LoginUrl::new(&app, "https://cb", "S1", &[])
            .build(API_HOST)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
    }

    #[test]
    fn scope_names_round_trip() {
        for scope in Scope::ALL.iter() {
            assert_eq!(&scope.as_str().parse::<Scope>().unwrap(), scope);
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = parse_scopes(&["basic", "photos"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(
            parse_scopes(&["basic", "likes"]).unwrap(),
            vec![Scope::Basic, Scope::Likes]
        );
    }
}

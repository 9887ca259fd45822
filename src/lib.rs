/*!
instagram-sdk: signed Instagram API requests over reqwest.

# Overview

This library wraps the Instagram OAuth2 flow and REST API. It builds the
authorization URL, exchanges the callback code for an access token, signs
every authenticated request with the application secret, and decodes the
`data`/`meta`/`pagination` envelope of the response.

# How to use

## Basic usecase 1 - acquiring the access token

```no_run
use instagram_sdk::{Client, Config, Scope};

# async fn run() -> instagram_sdk::Result<()> {
let config = Config::new("[CLIENT_ID]", "[CLIENT_SECRET]", "https://example.com/callback");
let client = Client::new(config)?;

// step 1. send the user to the login url
let url = client.login_url(&[Scope::Basic, Scope::PublicContent])?;
println!("please access to: {}", url);

// step 2. exchange the code passed to your callback
let token = client.oauth("[CODE]").await?;
println!("token: {}", token.access_token);
# Ok(())
# }
```

## Basic usecase 2 - calling the API

```no_run
use instagram_sdk::{Client, Config, Parameters};

# async fn run() -> instagram_sdk::Result<()> {
let client = Client::new(Config::new("[CLIENT_ID]", "[CLIENT_SECRET]", "https://example.com/callback"))?;

let params = Parameters::with_access_token("[ACCESS_TOKEN]").param("count", 10);
let resp = client.get("/users/self/media/recent", &params).await?;

println!("{:#?}", resp.data());
if let Some(next) = resp.next_url() {
    println!("more at {}", next);
}
println!("remaining calls: {}", client.rate_limit());
# Ok(())
# }
```
*/
mod client;
mod config;
mod error;
mod login;
mod request;
mod response;
mod secrets;
mod session;
mod signer;
mod transport;

// exposed to external program
pub use client::Client;
pub use config::Config;
pub use error::{Error, ErrorKind, Result, UpstreamError};
pub use login::{parse_scopes, LoginUrl, Scope};
pub use request::Parameters;
pub use response::Response;
pub use secrets::{App, SecretsProvider};
pub use session::{Session, TokenResponse};
pub use signer::{sign, Signer};
pub use transport::HttpClient;

// exposed constant variables
/// Base URL of the API, with trailing slash.
pub const API_HOST: &str = "https://api.instagram.com/";
/// Represents `access_token`.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Represents `sig`.
pub const SIGNATURE_KEY: &str = "sig";
/// Response header carrying the remaining call quota.
pub const RATE_LIMIT_HEADER: &str = "X-Ratelimit-Remaining";
/// Quota assumed until the API reports one (the sandbox limit).
pub const DEFAULT_RATE_LIMIT: u32 = 500;

// crate-private constant variables
pub(crate) const API_VERSION: &str = "v1";
pub(crate) const API_AUTH_PATH: &str = "oauth/authorize";
pub(crate) const API_TOKEN_PATH: &str = "oauth/access_token";

/// Version of this library.
pub fn library_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

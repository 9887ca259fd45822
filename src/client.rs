use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::Serialize;

use crate::login::{parse_scopes, LoginUrl, Scope};
use crate::{
    App, Config, Error, HttpClient, Parameters, Response, Result, Session, Signer,
    TokenResponse, UpstreamError, ACCESS_TOKEN_KEY, API_TOKEN_PATH, API_VERSION,
    DEFAULT_RATE_LIMIT, RATE_LIMIT_HEADER, SIGNATURE_KEY,
};

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_X_WWW_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const STATE_LEN: usize = 7;

/// An API client bound to one registered application.
///
/// Each client owns its rate-limit counter and its session; nothing is shared
/// between instances.
#[derive(Debug)]
pub struct Client<C = reqwest::Client> {
    http: C,
    app: App,
    callback_url: String,
    state: String,
    api_host: String,
    rate_limit: AtomicU32,
    session: OnceLock<Session>,
}

impl Client<reqwest::Client> {
    /// Constructs a new `Client` with its own `reqwest::Client`.
    ///
    /// Timeouts from the config are applied to the inner client.
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_duration() {
            builder = builder.timeout(non_zero("timeout", timeout)?);
        }
        if let Some(timeout) = config.connect_timeout_duration() {
            builder = builder.connect_timeout(non_zero("connect timeout", timeout)?);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("unable to build http client: {}", e)))?;
        Client::with_http_client(config, http)
    }
}

impl<C> Client<C>
where
    C: HttpClient,
{
    /// Constructs a new `Client` over the given transport.
    ///
    /// Transport settings in the config (timeouts) are not applied here.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] when the client id, secret or callback url
    /// is empty.
    pub fn with_http_client(config: Config, http: C) -> Result<Self> {
        let app = App::new(config.client_id.as_str(), config.client_secret.as_str())?;
        if config.callback_url.is_empty() {
            return Err(Error::Config(
                "the \"callback_url\" must be a non-empty string".to_string(),
            ));
        }
        let api_host = config.resolved_api_host();
        let state = config.state.unwrap_or_else(random_state);

        Ok(Client {
            http,
            app,
            callback_url: config.callback_url,
            state,
            api_host,
            rate_limit: AtomicU32::new(DEFAULT_RATE_LIMIT),
            session: OnceLock::new(),
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn http_client(&self) -> &C {
        &self.http
    }

    /// Remaining calls as last reported by the API.
    pub fn rate_limit(&self) -> u32 {
        self.rate_limit.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.get()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session().map(Session::access_token)
    }

    /// Set the session token unless one is already set.
    ///
    /// Returns `true` if the token was stored.
    pub fn set_access_token<T: Into<String>>(&self, token: T) -> bool {
        self.set_session(Session::new(token))
    }

    fn set_session(&self, session: Session) -> bool {
        match self.session.set(session) {
            Ok(()) => true,
            Err(rejected) => {
                if self.access_token() != Some(rejected.access_token()) {
                    log::debug!("session already holds an access token, ignoring the new one");
                }
                false
            }
        }
    }

    /// URL to send the user to for authorization.
    pub fn login_url(&self, scopes: &[Scope]) -> Result<String> {
        LoginUrl::new(&self.app, &self.callback_url, &self.state, scopes).build(&self.api_host)
    }

    /// Like [`login_url`](Self::login_url), taking raw scope names.
    pub fn login_url_str<S: AsRef<str>>(&self, scopes: &[S]) -> Result<String> {
        let scopes = parse_scopes(scopes)?;
        self.login_url(&scopes)
    }

    /// Exchange the authorization `code` from the callback for an access token.
    ///
    /// The session is populated from the response unless it already holds a
    /// token.
    pub async fn oauth(&self, code: &str) -> Result<TokenResponse> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'static str,
            client_id: &'a str,
            client_secret: &'a str,
            redirect_uri: &'a str,
            code: &'a str,
            state: &'a str,
        }

        let form = TokenRequest {
            grant_type: "authorization_code",
            client_id: self.app.id(),
            client_secret: self.app.secret(),
            redirect_uri: &self.callback_url,
            code,
            state: &self.state,
        };
        let body = serde_urlencoded::to_string(&form).map_err(|e| Error::Request(e.to_string()))?;
        let url = format!("{}{}", self.api_host, API_TOKEN_PATH);
        let request = http::Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_X_WWW_FORM_URLENCODED)
            .body(body.into_bytes())
            .map_err(|e| Error::Request(e.to_string()))?;

        let response = check_status(self.http.send(request).await?)?;
        let token = TokenResponse::from_body(response.body())?;
        self.set_session(Session::from(token.clone()));
        Ok(token)
    }

    /// Convenience method to make a signed `GET` request.
    pub async fn get(&self, path: &str, params: &Parameters) -> Result<Response> {
        self.request(path, params, Method::GET).await
    }

    /// Convenience method to make a signed `POST` request.
    pub async fn post(&self, path: &str, params: &Parameters) -> Result<Response> {
        self.request(path, params, Method::POST).await
    }

    /// Convenience method to make a signed `DELETE` request.
    pub async fn delete(&self, path: &str, params: &Parameters) -> Result<Response> {
        self.request(path, params, Method::DELETE).await
    }

    /// Send one signed, authenticated request to `v1<path>`.
    ///
    /// `path` starts with `/`, e.g. `/users/self`. `params` must carry
    /// `access_token`. For `GET` every parameter goes into the query; for other
    /// methods only `access_token` does and the rest is sent as a form body.
    /// The `sig` parameter always covers the full parameter set.
    ///
    /// # Errors
    ///
    /// Fails before touching the network with [`Error::Throttle`] when the
    /// rate limit is exhausted and with [`Error::Request`] when the access
    /// token is missing. Error statuses become [`Error::OAuth`], [`Error::Api`]
    /// or [`Error::Server`]. Nothing is retried.
    pub async fn request(&self, path: &str, params: &Parameters, method: Method) -> Result<Response> {
        if self.rate_limit() == 0 {
            return Err(Error::Throttle(
                "you have reached the API rate limit".to_string(),
            ));
        }
        let access_token = params.access_token().ok_or_else(|| {
            Error::Request(format!(
                "{} - api requires an authenticated user's access token",
                path
            ))
        })?;
        if !path.starts_with('/') {
            return Err(Error::Request(format!("path must start with '/': {}", path)));
        }
        if self.session().is_none() {
            self.set_access_token(access_token);
        }

        let signature = Signer::new(&self.app).generate_signature(path, params);
        let (query, form) = if method == Method::GET {
            (params.clone().param(SIGNATURE_KEY, &signature), None)
        } else {
            (
                Parameters::with_access_token(access_token).param(SIGNATURE_KEY, &signature),
                Some(params.without(ACCESS_TOKEN_KEY)),
            )
        };

        let query = serde_urlencoded::to_string(&query).map_err(|e| Error::Request(e.to_string()))?;
        let url = format!("{}{}{}?{}", self.api_host, API_VERSION, path, query);
        let mut builder = http::Request::builder()
            .method(method)
            .uri(url)
            .header(ACCEPT, APPLICATION_JSON);
        let body = match form {
            Some(form) => {
                builder = builder.header(CONTENT_TYPE, APPLICATION_X_WWW_FORM_URLENCODED);
                serde_urlencoded::to_string(&form)
                    .map_err(|e| Error::Request(e.to_string()))?
                    .into_bytes()
            }
            None => Vec::new(),
        };
        let request = builder
            .body(body)
            .map_err(|e| Error::Request(e.to_string()))?;

        let response = check_status(self.http.send(request).await?)?;
        let response = Response::from_http(response)?;
        self.update_rate_limit(&response);
        Ok(response)
    }

    fn update_rate_limit(&self, response: &Response) {
        let header = response.header(RATE_LIMIT_HEADER);
        match header.first() {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(remaining) => self.rate_limit.store(remaining, Ordering::SeqCst),
                Err(_) => log::warn!("ignoring unparseable {} header: {:?}", RATE_LIMIT_HEADER, value),
            },
            None => log::warn!("response carried no {} header", RATE_LIMIT_HEADER),
        }
    }
}

/// Turn error statuses into errors.
///
/// 4xx bodies are classified; an empty 4xx body or any 5xx is a server error.
fn check_status(response: http::Response<Vec<u8>>) -> Result<http::Response<Vec<u8>>> {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(response);
    }
    if status.is_client_error() && !response.body().is_empty() {
        return Err(UpstreamError::from_body(response.body())?.into_error());
    }
    Err(server_error(status, response.body()))
}

fn server_error(status: StatusCode, body: &[u8]) -> Error {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        String::from_utf8_lossy(body).into_owned()
    };
    Error::Server {
        status: status.as_u16(),
        message,
    }
}

fn non_zero(name: &str, timeout: Duration) -> Result<Duration> {
    if timeout == Duration::from_secs(0) {
        return Err(Error::Config(format!("the {} must be greater than zero", name)));
    }
    Ok(timeout)
}

fn random_state() -> String {
    let bytes: [u8; 4] = rand::random();
    let mut state = hex::encode(bytes);
    state.truncate(STATE_LEN);
    state
}

use async_trait::async_trait;

use crate::{Error, Result};

/// Sends one HTTP request and returns the raw response.
///
/// Error statuses are returned as responses, not as errors; only failures to
/// reach the server or to read the body are `Err`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>>;
}

#[async_trait]
impl<'a, T> HttpClient for &'a T
where
    T: HttpClient,
{
    async fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>> {
        T::send(*self, request).await
    }
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>> {
        log::debug!("HTTP request: {} {}", request.method(), request.uri());
        log::trace!("HTTP request: {:?}", request);

        let (parts, body) = request.into_parts();
        let mut builder = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }
        let response = builder.send().await.map_err(Error::transport)?;

        let mut converted = http::Response::builder()
            .status(response.status())
            .version(response.version());
        for (name, value) in response.headers().iter() {
            converted = converted.header(name, value);
        }
        let body = response.bytes().await.map_err(Error::transport)?.to_vec();
        let converted = converted.body(body).map_err(Error::transport)?;

        log::trace!("HTTP response: {:?}", converted);
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn reqwest_failures_keep_their_source() {
        // no scheme, so reqwest rejects it before connecting
        let request = http::Request::builder()
            .uri("/users/self")
            .body(Vec::new())
            .unwrap();
        let err = HttpClient::send(&reqwest::Client::new(), request)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.reqwest_error().unwrap().is_builder());
        assert!(std::error::Error::source(&err).is_some());
    }
}

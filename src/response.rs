use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Error, Result};

const DATA_KEY: &str = "data";
const META_KEY: &str = "meta";
const PAGINATION_KEY: &str = "pagination";

/// A successful API response with its envelope decoded.
///
/// `data` is always present. `meta` and `pagination` are optional; a `null`
/// section counts as absent.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Value,
    data: Value,
    metadata: Option<Value>,
    pagination: Option<Value>,
}

impl Response {
    /// Decode a raw transport response.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidResponse`] when the body is not a JSON object
    /// or has no `data` member.
    pub fn from_http(response: http::Response<Vec<u8>>) -> Result<Self> {
        let (parts, body) = response.into_parts();
        let object: Map<String, Value> = serde_json::from_slice(&body)
            .map_err(|e| Error::invalid_response(format!("body is not a JSON object: {}", e)))?;

        let data = object
            .get(DATA_KEY)
            .cloned()
            .ok_or_else(|| Error::invalid_response("body has no `data` member"))?;
        let metadata = present(&object, META_KEY);
        let pagination = present(&object, PAGINATION_KEY);

        Ok(Response {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body: Value::Object(object),
            data,
            metadata,
            pagination,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Protocol version such as `"1.1"` or `"2"`.
    pub fn protocol(&self) -> String {
        let version = format!("{:?}", self.version);
        version.trim_start_matches("HTTP/").to_string()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// All values of a header, in the order received.
    ///
    /// Names are matched case-insensitively. Values that are not visible
    /// ASCII are skipped. Returns an empty vector when absent.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// The whole decoded body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Deserialize `data` into a caller-provided type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.data).map_err(Error::invalid_response)
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn is_metadata_set(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn pagination(&self) -> Option<&Value> {
        self.pagination.as_ref()
    }

    pub fn is_pagination_set(&self) -> bool {
        self.pagination.is_some()
    }

    /// `pagination.next_url`, if the API sent one.
    pub fn next_url(&self) -> Option<&str> {
        self.pagination_str("next_url")
    }

    /// `pagination.next_max_id`, if the API sent one.
    pub fn next_max_id(&self) -> Option<&str> {
        self.pagination_str("next_max_id")
    }

    fn pagination_str(&self, key: &str) -> Option<&str> {
        self.pagination.as_ref()?.get(key)?.as_str()
    }
}

fn present(object: &Map<String, Value>, key: &str) -> Option<Value> {
    object.get(key).filter(|v| !v.is_null()).cloned()
}

//! Request parameter bags and the rules that turn them into `HttpRequest`s.
//!
//! # Design
//! A `RequestSpec` is what scripted callers hand over: a URL, headers, an
//! optional data payload and decoding hints. `build_request` applies the
//! method-dependent placement rule. For GET the structured payload is
//! flattened into the query string and no body is sent; for every other
//! method it becomes a JSON body and the URL is left alone.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::{self, HttpMethod, HttpRequest, ResponseType, DEFAULT_TIMEOUT_MS};

/// Characters left unescaped by a URI component encoder.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Payload attached to a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestData {
    /// Sent verbatim as the body; never added to a query string.
    Raw(String),
    /// Structured value: query pairs for GET, JSON body otherwise.
    Json(Value),
}

impl From<Value> for RequestData {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RequestData::Raw(text),
            other => RequestData::Json(other),
        }
    }
}

/// Everything needed to issue one request except the method.
///
/// Deserializes from the parameter bag scripts pass around:
/// `{url, headers, data, type, timeout}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestSpec {
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "headers_from_map")]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub data: Option<RequestData>,
    #[serde(default, rename = "type")]
    pub response_type: ResponseType,
    #[serde(default = "default_timeout", rename = "timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn headers_from_map<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(name, value)| (name, render_value(&value)))
        .collect())
}

impl RequestSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            data: None,
            response_type: ResponseType::Json,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Parse a scripted parameter bag from its JSON text.
    pub fn from_json(params: &str) -> Result<Self, ApiError> {
        serde_json::from_str(params).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        http::set_header(&mut self.headers, name, value.into());
        self
    }

    /// Attach request data. A JSON string is sent as-is, like a string
    /// `data` in the parameter bag.
    pub fn data(mut self, value: Value) -> Self {
        self.data = Some(RequestData::from(value));
        self
    }

    /// Attach any serializable value as request data.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.data(value))
    }

    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.data = Some(RequestData::Raw(body.into()));
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub(crate) fn set_header(&mut self, name: &str, value: String) {
        http::set_header(&mut self.headers, name, value);
    }
}

/// Build the request the host should dispatch for `method` and `spec`.
pub fn build_request(method: HttpMethod, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
    let mut url = spec.url.clone();
    let body = match method {
        HttpMethod::Get => {
            let pairs = match &spec.data {
                Some(RequestData::Json(value)) => query_pairs(value),
                _ => Vec::new(),
            };
            append_query(&mut url, &pairs);
            None
        }
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => match &spec.data {
            Some(RequestData::Json(value)) => Some(
                serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            Some(RequestData::Raw(body)) => Some(body.clone()),
            None => None,
        },
    };

    Ok(HttpRequest {
        method,
        response_type: spec.response_type,
        url,
        headers: spec.headers.clone(),
        body,
        timeout_ms: spec.timeout_ms,
    })
}

/// Flatten structured data into `(key, value)` pairs in iteration order.
///
/// Objects yield their entries, arrays their indices. Scalars yield nothing.
pub fn query_pairs(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), render_value(v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), render_value(v)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Append encoded pairs to `url`, adding the `?` marker if it is missing.
///
/// A pair is separated by `&` unless the URL already ends in `?` or `&`.
pub fn append_query(url: &mut String, pairs: &[(String, String)]) {
    if !url.contains('?') {
        url.push('?');
    }
    for (key, value) in pairs {
        if !(url.ends_with('?') || url.ends_with('&')) {
            url.push('&');
        }
        url.push_str(&encode_component(key));
        url.push('=');
        url.push_str(&encode_component(value));
    }
}

/// Percent-encode a single URI component.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Render a JSON value the way it appears in a query string or header.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_flattens_data_into_query() {
        let spec = RequestSpec::new("https://api/x").data(json!({"a": 1, "b": "c d"}));
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api/x?a=1&b=c%20d");
        assert!(req.body.is_none());
    }

    #[test]
    fn post_serializes_data_into_body() {
        let spec = RequestSpec::new("https://api/x").data(json!({"a": 1}));
        let req = build_request(HttpMethod::Post, &spec).unwrap();
        assert_eq!(req.url, "https://api/x");
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn get_keeps_existing_query_and_separates_with_ampersand() {
        let spec = RequestSpec::new("https://api/x?page=2").data(json!({"q": "a&b"}));
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.url, "https://api/x?page=2&q=a%26b");
    }

    #[test]
    fn get_without_data_only_adds_marker() {
        let req = build_request(HttpMethod::Get, &RequestSpec::new("https://api/x")).unwrap();
        assert_eq!(req.url, "https://api/x?");
        assert!(req.body.is_none());
    }

    #[test]
    fn get_preserves_insertion_order() {
        let spec = RequestSpec::new("https://api/x").data(json!({"z": 1, "a": 2, "m": 3}));
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.url, "https://api/x?z=1&a=2&m=3");
    }

    #[test]
    fn get_ignores_raw_data() {
        let spec = RequestSpec::new("https://api/x").raw_body("a=1");
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.url, "https://api/x?");
        assert!(req.body.is_none());
    }

    #[test]
    fn component_encoding_matches_uri_component_rules() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_component("a/b?c=d#e"), "a%2Fb%3Fc%3Dd%23e");
        assert_eq!(encode_component("中"), "%E4%B8%AD");
    }

    #[test]
    fn query_values_render_like_script_strings() {
        let pairs = query_pairs(&json!({"n": null, "t": true, "list": [1, "x"], "f": 1.5}));
        assert_eq!(
            pairs,
            vec![
                ("n".to_string(), "null".to_string()),
                ("t".to_string(), "true".to_string()),
                ("list".to_string(), "1,x".to_string()),
                ("f".to_string(), "1.5".to_string()),
            ]
        );
    }

    #[test]
    fn array_data_uses_indices_as_keys() {
        let spec = RequestSpec::new("https://api/x").data(json!(["p", "q"]));
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.url, "https://api/x?0=p&1=q");
    }

    #[test]
    fn raw_body_passes_through_for_put() {
        let spec = RequestSpec::new("https://api/x").raw_body("name=link&x=1");
        let req = build_request(HttpMethod::Put, &spec).unwrap();
        assert_eq!(req.body.as_deref(), Some("name=link&x=1"));
        assert_eq!(req.url, "https://api/x");
    }

    #[test]
    fn string_data_is_sent_verbatim() {
        let built = RequestSpec::new("https://api/x").data(json!("a=1"));
        let parsed = RequestSpec::from_json(r#"{"url":"https://api/x","data":"a=1"}"#).unwrap();
        assert_eq!(built.data, Some(RequestData::Raw("a=1".to_string())));

        let req = build_request(HttpMethod::Post, &built).unwrap();
        assert_eq!(req.body.as_deref(), Some("a=1"));
        assert_eq!(req, build_request(HttpMethod::Post, &parsed).unwrap());

        let typed = RequestSpec::new("https://api/x").json(&"a=1").unwrap();
        let req = build_request(HttpMethod::Put, &typed).unwrap();
        assert_eq!(req.body.as_deref(), Some("a=1"));
    }

    #[test]
    fn delete_without_data_has_no_body() {
        let req = build_request(HttpMethod::Delete, &RequestSpec::new("https://api/x/1")).unwrap();
        assert!(req.body.is_none());
        assert_eq!(req.url, "https://api/x/1");
    }

    #[test]
    fn spec_decodes_script_params() {
        let params = json!({
            "url": "https://api/x",
            "headers": {"X-App": "demo", "X-Ver": 2},
            "data": {"a": 1},
            "type": "text",
            "timeout": 5000
        });
        let spec = RequestSpec::from_json(&params.to_string()).unwrap();
        assert_eq!(spec.url, "https://api/x");
        assert_eq!(
            spec.headers,
            vec![
                ("X-App".to_string(), "demo".to_string()),
                ("X-Ver".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(spec.data, Some(RequestData::Json(json!({"a": 1}))));
        assert_eq!(spec.response_type, ResponseType::Text);
        assert_eq!(spec.timeout_ms, 5000);
    }

    #[test]
    fn spec_defaults_apply_to_sparse_params() {
        let spec = RequestSpec::from_json(r#"{"url":"https://api/x","data":"raw"}"#).unwrap();
        assert!(spec.headers.is_empty());
        assert_eq!(spec.data, Some(RequestData::Raw("raw".to_string())));
        assert_eq!(spec.response_type, ResponseType::Json);
        assert_eq!(spec.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn json_builder_accepts_serializable_structs() {
        #[derive(Serialize)]
        struct Query {
            page: u32,
        }
        let spec = RequestSpec::new("https://api/x").json(&Query { page: 3 }).unwrap();
        let req = build_request(HttpMethod::Get, &spec).unwrap();
        assert_eq!(req.url, "https://api/x?page=3");
    }
}

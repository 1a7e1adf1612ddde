//! Builders for calls into the host's native modules.
//!
//! # Design
//! Host capabilities (the `LinkModule` and `ScheduleModule` native
//! modules) are invoked with a method name, one payload argument and a pair
//! of callbacks. The core does not invoke them itself: it builds `HostCall`
//! values and the host executes them, the same split the request layer uses
//! for HTTP. Callbacks stay on the host side; replies that need decoding go
//! through `parse_json_reply`.

pub mod link;
pub mod pages;
pub mod schedule;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub use link::{LinkApi, LocationOptions, PdfTarget, RunApp, UserLookup};
pub use pages::{BuiltInPage, LaunchScript};
pub use schedule::ScheduleApi;

/// Native module a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostModule {
    #[serde(rename = "LinkModule")]
    Link,
    #[serde(rename = "ScheduleModule")]
    Schedule,
}

impl HostModule {
    pub fn name(self) -> &'static str {
        match self {
            HostModule::Link => "LinkModule",
            HostModule::Schedule => "ScheduleModule",
        }
    }
}

/// One invocation of a host module method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostCall {
    pub module: HostModule,
    pub method: String,
    /// The single argument passed before the callbacks.
    pub payload: Value,
}

impl HostCall {
    /// A `LinkModule` call; its arguments travel as one positional array.
    pub fn link(method: &str, args: Vec<Value>) -> Self {
        Self {
            module: HostModule::Link,
            method: method.to_string(),
            payload: Value::Array(args),
        }
    }

    pub fn schedule(method: &str, payload: Value) -> Self {
        Self {
            module: HostModule::Schedule,
            method: method.to_string(),
            payload,
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Platform the container runs on, as reported in the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "iOS")]
    Ios,
    #[default]
    #[serde(rename = "Web")]
    Web,
}

impl Platform {
    /// Map the host's platform string; anything unrecognised is the web.
    pub fn from_env_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("android") {
            Platform::Android
        } else if name.eq_ignore_ascii_case("ios") {
            Platform::Ios
        } else {
            Platform::Web
        }
    }
}

/// Normalise a host reply that may arrive as JSON text or as a value.
pub fn parse_json_reply(reply: Value) -> Result<Value, ApiError> {
    match reply {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        }
        Value::Object(_) | Value::Array(_) => Ok(reply),
        other => Err(ApiError::Deserialization(format!(
            "expected an object or JSON text, got `{other}`"
        ))),
    }
}

/// A place picked through the host's location selector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub addr: String,
}

impl Location {
    pub fn from_reply(reply: Value) -> Result<Self, ApiError> {
        serde_json::from_value(parse_json_reply(reply)?)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

//! Request and host-call core for the Link mobile container bridge.
//!
//! # Overview
//! Builds `HttpRequest` values, maps the host's `ResponseEnvelope`s and
//! drives authenticated requests (bearer token, one refresh-and-retry after
//! a 401) without touching the network. The host's streaming and token
//! capabilities are reached through the `Transport` and `TokenProvider`
//! traits, or by driving `AuthFlow` step by step.
//!
//! # Design
//! - `request` decides where request data goes: query string for GET, JSON
//!   body otherwise.
//! - `transport::exec` is the single-dispatch primitive; `AuthClient` adds
//!   token injection on top of it.
//! - `flow::AuthFlow` is sans-IO, so the retry bound is enforced in one
//!   place for both async Rust callers and C hosts.
//! - `host` builds native-module calls as data for the host to execute.

pub mod auth;
pub mod config;
pub mod error;
pub mod flow;
pub mod host;
pub mod http;
pub mod request;
pub mod transport;

pub use auth::{AuthClient, Token, TokenProvider};
pub use config::{ClientConfig, Environment};
pub use error::ApiError;
pub use flow::{AuthFlow, FlowState, Step};
pub use host::{HostCall, HostModule, LinkApi, Platform, ScheduleApi};
pub use http::{HttpMethod, HttpRequest, Reply, ResponseEnvelope, ResponseType};
pub use request::{build_request, RequestData, RequestSpec};
pub use transport::{exec, Ajax, Transport};

//! The transport primitive: one request in, one envelope out.
//!
//! # Design
//! `Transport` is the seam to the host's streaming capability. The core
//! never opens sockets; it hands a fully built `HttpRequest` to the
//! transport and maps the envelope it receives. `exec` dispatches exactly
//! once and leaves timeouts to the host.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Reply, ResponseEnvelope};
use crate::request::{build_request, RequestSpec};

/// Host capability that performs the network round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dispatch `request` and return the host's envelope.
    ///
    /// `Err` means no envelope was produced at all; a response with a
    /// failure status is still `Ok` with `ok: false`.
    async fn dispatch(&self, request: HttpRequest) -> Result<ResponseEnvelope, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn dispatch(&self, request: HttpRequest) -> Result<ResponseEnvelope, ApiError> {
        (**self).dispatch(request).await
    }
}

/// Perform one request described by `method` and `spec`.
pub async fn exec<T>(
    transport: &T,
    method: HttpMethod,
    spec: &RequestSpec,
) -> Result<Reply, ApiError>
where
    T: Transport + ?Sized,
{
    let request = build_request(method, spec)?;
    debug!(method = %method, url = %request.url, "dispatching request");
    let envelope = transport.dispatch(request).await?;
    debug!(ok = envelope.ok, status = envelope.status, "request completed");
    envelope.into_result()
}

/// Unauthenticated request helper bound to a transport.
#[derive(Debug, Clone)]
pub struct Ajax<T> {
    transport: T,
}

impl<T: Transport> Ajax<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn exec(&self, method: HttpMethod, spec: &RequestSpec) -> Result<Reply, ApiError> {
        exec(&self.transport, method, spec).await
    }

    pub async fn get(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.exec(HttpMethod::Get, spec).await
    }

    pub async fn post(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.exec(HttpMethod::Post, spec).await
    }

    pub async fn put(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.exec(HttpMethod::Put, spec).await
    }

    pub async fn delete(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.exec(HttpMethod::Delete, spec).await
    }
}

//! Bearer tokens and the authenticated request façade.
//!
//! # Design
//! `AuthClient` is a thin async driver around `AuthFlow`: it answers each
//! `Step` by calling the token capability or the transport. Tokens are
//! never cached here; every call asks the provider again, and the provider
//! owns any caching or expiry. Each call builds its own flow, so concurrent
//! calls never share header state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::flow::{AuthFlow, Step};
use crate::http::{HttpMethod, Reply};
use crate::request::RequestSpec;
use crate::transport::Transport;

/// An opaque bearer credential handed out by the host.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Host capability that hands out and refreshes access tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, as the host sees it.
    async fn get_token(&self) -> Result<Token, ApiError>;

    /// Force the host to obtain a new token.
    async fn refresh_token(&self) -> Result<Token, ApiError>;
}

#[async_trait]
impl<P: TokenProvider + ?Sized> TokenProvider for std::sync::Arc<P> {
    async fn get_token(&self) -> Result<Token, ApiError> {
        (**self).get_token().await
    }

    async fn refresh_token(&self) -> Result<Token, ApiError> {
        (**self).refresh_token().await
    }
}

/// Request client that attaches bearer tokens and retries once after a 401.
#[derive(Debug, Clone)]
pub struct AuthClient<T, P> {
    transport: T,
    tokens: P,
}

impl<T: Transport, P: TokenProvider> AuthClient<T, P> {
    pub fn new(transport: T, tokens: P) -> Self {
        Self { transport, tokens }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn tokens(&self) -> &P {
        &self.tokens
    }

    /// Perform an authenticated request.
    ///
    /// Any `Authorization` header in `spec` is replaced by the bearer token.
    pub async fn fetch(&self, method: HttpMethod, spec: &RequestSpec) -> Result<Reply, ApiError> {
        let mut flow = AuthFlow::new(method, spec.clone());
        let mut step = flow.start();
        loop {
            step = match step {
                Step::AcquireToken => flow.on_token(self.tokens.get_token().await),
                Step::Dispatch(request) => flow.on_response(self.transport.dispatch(request).await),
                Step::RefreshToken => flow.on_refresh(self.tokens.refresh_token().await),
                Step::Done(outcome) => return outcome,
            };
        }
    }

    pub async fn get(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.fetch(HttpMethod::Get, spec).await
    }

    pub async fn post(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.fetch(HttpMethod::Post, spec).await
    }

    pub async fn put(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.fetch(HttpMethod::Put, spec).await
    }

    pub async fn delete(&self, spec: &RequestSpec) -> Result<Reply, ApiError> {
        self.fetch(HttpMethod::Delete, spec).await
    }
}

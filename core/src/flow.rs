//! Sans-IO state machine for one authenticated request.
//!
//! # Design
//! `AuthFlow` owns the request spec for a single call and tells its driver
//! what to do next through `Step` values. The driver performs the step
//! (ask the token capability, dispatch through the transport, refresh the
//! token) and feeds the outcome back. The async `AuthClient` is one driver;
//! a C host drives the same machine through the FFI.
//!
//! ```text
//! Start ──start──▶ AwaitingToken ──on_token──▶ AwaitingResponse
//!                                                   │ 401
//!                                                   ▼
//!               AwaitingRetryResponse ◀──on_refresh── Refreshing
//! ```
//!
//! Every other outcome moves to `Finished` with `Step::Done`. The refresh
//! counter is bounded by `MAX_REFRESHES`, so a second 401 is terminal.

use tracing::{debug, warn};

use crate::auth::Token;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Reply, ResponseEnvelope};
use crate::request::{build_request, RequestSpec};

/// Number of token refreshes a single call may trigger.
pub const MAX_REFRESHES: u8 = 1;

const AUTHORIZATION: &str = "Authorization";

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Ask the token capability for the current token, then call `on_token`.
    AcquireToken,
    /// Dispatch this request, then call `on_response`.
    Dispatch(HttpRequest),
    /// Ask the token capability for a fresh token, then call `on_refresh`.
    RefreshToken,
    /// The call is over.
    Done(Result<Reply, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    AwaitingToken,
    AwaitingResponse,
    Refreshing,
    AwaitingRetryResponse,
    Finished,
}

#[derive(Debug, Clone)]
pub struct AuthFlow {
    method: HttpMethod,
    spec: RequestSpec,
    state: FlowState,
    refreshes: u8,
}

impl AuthFlow {
    pub fn new(method: HttpMethod, spec: RequestSpec) -> Self {
        Self {
            method,
            spec,
            state: FlowState::Start,
            refreshes: 0,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// How many token refreshes this call has requested so far.
    pub fn refreshes(&self) -> u8 {
        self.refreshes
    }

    pub fn is_finished(&self) -> bool {
        self.state == FlowState::Finished
    }

    pub fn start(&mut self) -> Step {
        if self.state != FlowState::Start {
            return self.fail("flow already started");
        }
        self.state = FlowState::AwaitingToken;
        Step::AcquireToken
    }

    pub fn on_token(&mut self, token: Result<Token, ApiError>) -> Step {
        if self.state != FlowState::AwaitingToken {
            return self.fail("token delivered while not acquiring one");
        }
        match token {
            Ok(token) => self.dispatch_with(&token, FlowState::AwaitingResponse),
            Err(err) => self.finish(Err(err)),
        }
    }

    pub fn on_response(&mut self, response: Result<ResponseEnvelope, ApiError>) -> Step {
        if !matches!(
            self.state,
            FlowState::AwaitingResponse | FlowState::AwaitingRetryResponse
        ) {
            return self.fail("response delivered while no request was in flight");
        }
        match response.and_then(ResponseEnvelope::into_result) {
            Err(err) if err.is_unauthorized() && self.refreshes < MAX_REFRESHES => {
                self.refreshes += 1;
                self.state = FlowState::Refreshing;
                warn!(
                    method = %self.method,
                    url = %self.spec.url,
                    "access token rejected, refreshing"
                );
                Step::RefreshToken
            }
            outcome => self.finish(outcome),
        }
    }

    pub fn on_refresh(&mut self, token: Result<Token, ApiError>) -> Step {
        if self.state != FlowState::Refreshing {
            return self.fail("refreshed token delivered while not refreshing");
        }
        match token {
            Ok(token) => self.dispatch_with(&token, FlowState::AwaitingRetryResponse),
            Err(err) => self.finish(Err(err)),
        }
    }

    fn dispatch_with(&mut self, token: &Token, next: FlowState) -> Step {
        self.spec.set_header(AUTHORIZATION, token.bearer());
        match build_request(self.method, &self.spec) {
            Ok(request) => {
                self.state = next;
                Step::Dispatch(request)
            }
            Err(err) => self.finish(Err(err)),
        }
    }

    fn fail(&mut self, reason: &'static str) -> Step {
        self.finish(Err(ApiError::InvalidState(reason)))
    }

    fn finish(&mut self, outcome: Result<Reply, ApiError>) -> Step {
        self.state = FlowState::Finished;
        match &outcome {
            Ok(reply) => debug!(status = reply.status, "authenticated request succeeded"),
            Err(err) => debug!(error = %err, "authenticated request failed"),
        }
        Step::Done(outcome)
    }
}

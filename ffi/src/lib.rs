//! C-ABI wrapper around `linkapi-core`.
//!
//! # Overview
//! Lets a native host (the mobile container, or any language with a C FFI)
//! build requests and run the authenticated request flow without linking
//! an async runtime. The host owns all I/O: it executes `FfiHttpRequest`s,
//! fetches and refreshes tokens, and feeds the outcomes back in.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `linkapi_build_request` / `linkapi_parse_envelope` are the single
//!   unauthenticated round-trip; `linkapi_flow_*` drives `AuthFlow` one
//!   `FfiStep` at a time.
//! - The C caller owns all returned pointers and must call the matching
//!   `linkapi_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use linkapi_core::{ApiError, AuthFlow, HttpMethod, RequestSpec, Token};

use types::*;

fn parse_spec(params_json: *const c_char) -> Option<RequestSpec> {
    let params = unsafe { read_str(params_json) }?;
    RequestSpec::from_json(params).ok()
}

// ---------------------------------------------------------------------------
// Single round-trip
// ---------------------------------------------------------------------------

/// Build a request from a JSON parameter bag
/// (`{"url", "headers", "data", "type", "timeout"}`).
///
/// Returns null if `params_json` is null, is not valid parameters, or the
/// data cannot be serialized. The caller must free the returned pointer
/// with `linkapi_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_build_request(
    method: FfiHttpMethod,
    params_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(spec) = parse_spec(params_json) else {
            return std::ptr::null_mut();
        };
        match linkapi_core::build_request(method.into(), &spec) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Resolve the host's answer to a request built by `linkapi_build_request`.
///
/// `ok` envelopes yield the decoded payload; anything else an `Http` error
/// carrying the status. The caller must free the result with
/// `linkapi_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_parse_envelope(
    envelope: *const FfiResponseEnvelope,
    response_type: FfiResponseType,
) -> *mut FfiResult {
    catch_unwind(|| {
        if envelope.is_null() {
            return FfiResult::null_arg("envelope");
        }
        let envelope = unsafe { &*envelope };
        let outcome = envelope
            .to_core(response_type.into())
            .and_then(|env| env.into_result());
        FfiResult::from_core(outcome)
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in linkapi_parse_envelope"))
}

// ---------------------------------------------------------------------------
// Authenticated flow
// ---------------------------------------------------------------------------

/// Create the flow for one authenticated call.
///
/// Returns null if `params_json` is null or not valid parameters. The caller
/// must free the returned pointer with `linkapi_flow_free`.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_new(
    method: FfiHttpMethod,
    params_json: *const c_char,
) -> *mut FfiAuthFlow {
    catch_unwind(|| {
        let Some(spec) = parse_spec(params_json) else {
            return std::ptr::null_mut();
        };
        let response_type = spec.response_type;
        Box::into_raw(Box::new(FfiAuthFlow {
            inner: AuthFlow::new(HttpMethod::from(method), spec),
            response_type,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Run `f` against the flow behind `flow`, turning null and panics into a
/// `Done` step.
fn with_flow(
    name: &'static str,
    flow: *mut FfiAuthFlow,
    f: impl FnOnce(&mut FfiAuthFlow) -> linkapi_core::Step,
) -> *mut FfiStep {
    catch_unwind(AssertUnwindSafe(|| {
        if flow.is_null() {
            return FfiStep::done(FfiResult::null_arg("flow"));
        }
        let flow = unsafe { &mut *flow };
        FfiStep::from_core(f(flow))
    }))
    .unwrap_or_else(|_| FfiStep::done(FfiResult::panic(name)))
}

/// Read a token handed back by the host: the token if present, otherwise
/// the host's error message.
fn token_outcome(
    token: *const c_char,
    error: *const c_char,
    into_err: fn(String) -> ApiError,
) -> Result<Token, ApiError> {
    match unsafe { read_str(token) } {
        Some(token) => Ok(Token::new(token)),
        None => {
            let msg = unsafe { read_str(error) }.unwrap_or("host returned no token");
            Err(into_err(msg.to_string()))
        }
    }
}

/// Begin the call. The first step is always `AcquireToken`.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_start(flow: *mut FfiAuthFlow) -> *mut FfiStep {
    with_flow("panic in linkapi_flow_start", flow, |flow| flow.inner.start())
}

/// Hand the current token to the flow. Pass null `token` and a message in
/// `error` when the host could not produce one.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_on_token(
    flow: *mut FfiAuthFlow,
    token: *const c_char,
    error: *const c_char,
) -> *mut FfiStep {
    with_flow("panic in linkapi_flow_on_token", flow, |flow| {
        flow.inner.on_token(token_outcome(token, error, ApiError::Token))
    })
}

/// Hand the host's answer to the last dispatched request to the flow.
///
/// A null `envelope` reports a transport failure.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_on_response(
    flow: *mut FfiAuthFlow,
    envelope: *const FfiResponseEnvelope,
) -> *mut FfiStep {
    with_flow("panic in linkapi_flow_on_response", flow, |flow| {
        let response = if envelope.is_null() {
            Err(ApiError::Transport("host returned no response".to_string()))
        } else {
            unsafe { &*envelope }.to_core(flow.response_type)
        };
        flow.inner.on_response(response)
    })
}

/// Hand the refreshed token to the flow. Pass null `token` and a message in
/// `error` when the refresh failed.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_on_refresh(
    flow: *mut FfiAuthFlow,
    token: *const c_char,
    error: *const c_char,
) -> *mut FfiStep {
    with_flow("panic in linkapi_flow_on_refresh", flow, |flow| {
        flow.inner
            .on_refresh(token_outcome(token, error, ApiError::TokenRefresh))
    })
}

/// Free a flow created by `linkapi_flow_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_flow_free(flow: *mut FfiAuthFlow) {
    if !flow.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(flow) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `linkapi_build_request`.
/// Safe to call with null. Requests inside a step are freed with the step.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_free_request(req: *mut FfiHttpRequest) {
    let _ = catch_unwind(AssertUnwindSafe(|| FfiHttpRequest::release(req)));
}

/// Free an `FfiResult` returned by `linkapi_parse_envelope`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_free_result(result: *mut FfiResult) {
    let _ = catch_unwind(AssertUnwindSafe(|| FfiResult::release(result)));
}

/// Free an `FfiStep` together with the request or result it carries.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_free_step(step: *mut FfiStep) {
    let _ = catch_unwind(AssertUnwindSafe(|| FfiStep::release(step)));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn linkapi_free_string(s: *mut c_char) {
    let _ = catch_unwind(AssertUnwindSafe(|| drop_c_string(s)));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

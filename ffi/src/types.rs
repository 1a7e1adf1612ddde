//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, JSON
//! text instead of `serde_json::Value`, and enums with explicit
//! discriminants. Conversions live here so `lib.rs` stays focused on the
//! `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use linkapi_core::{
    ApiError, AuthFlow, HttpMethod, HttpRequest, Reply, ResponseEnvelope, ResponseType, Step,
};
use serde_json::Value;

/// Opaque handle to one authenticated call. Created by `linkapi_flow_new`
/// and released with `linkapi_flow_free`.
pub struct FfiAuthFlow {
    pub(crate) inner: AuthFlow,
    pub(crate) response_type: ResponseType,
}

// ---------------------------------------------------------------------------
// C strings
// ---------------------------------------------------------------------------

/// Move a Rust string onto the C heap. Interior NULs are dropped.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let cstring = CString::new(s.into()).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    cstring.into_raw()
}

/// Borrow a caller-owned C string. `None` for null or non-UTF-8 input.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Release a string produced by `c_string`. Null is ignored.
pub(crate) fn drop_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// How the host should decode the response body.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResponseType {
    Json = 0,
    Text = 1,
}

impl From<ResponseType> for FfiResponseType {
    fn from(t: ResponseType) -> Self {
        match t {
            ResponseType::Json => FfiResponseType::Json,
            ResponseType::Text => FfiResponseType::Text,
        }
    }
}

impl From<FfiResponseType> for ResponseType {
    fn from(t: FfiResponseType) -> Self {
        match t {
            FfiResponseType::Json => ResponseType::Json,
            FfiResponseType::Text => ResponseType::Text,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An outbound request described as C-compatible plain data.
///
/// `body` is null when the request carries no body. The host executes the
/// request and answers with an `FfiResponseEnvelope`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub response_type: FfiResponseType,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            response_type: req.response_type.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body,
            timeout_ms: req.timeout_ms,
        }))
    }

    /// Release a request produced by `from_core`. Null is ignored.
    pub(crate) fn release(req: *mut Self) {
        if req.is_null() {
            return;
        }
        let req = unsafe { Box::from_raw(req) };
        drop_c_string(req.url);
        drop_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                drop_c_string(h.key);
                drop_c_string(h.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The host's answer to one dispatched request.
///
/// The caller builds this on its own stack after executing the request.
/// `data` is the raw response body; the FFI layer decodes it according to
/// the response type and never frees these fields.
#[repr(C)]
pub struct FfiResponseEnvelope {
    pub ok: bool,
    pub status: u16,
    pub status_text: *const c_char,
    pub data: *const c_char,
}

impl FfiResponseEnvelope {
    /// Read the envelope into a core `ResponseEnvelope`.
    ///
    /// A successful reply must be UTF-8 and, for JSON, must decode; failed
    /// replies keep no payload since only their status is surfaced. Invalid
    /// UTF-8 in the status text is replaced, not dropped.
    pub(crate) fn to_core(
        &self,
        response_type: ResponseType,
    ) -> Result<ResponseEnvelope, ApiError> {
        let status_text = if self.status_text.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(self.status_text) }
                .to_string_lossy()
                .into_owned()
        };
        let data = if self.ok {
            decode_payload(self.body_text()?, response_type)?
        } else {
            Value::Null
        };
        Ok(ResponseEnvelope {
            ok: self.ok,
            status: self.status,
            status_text,
            data,
        })
    }

    fn body_text(&self) -> Result<&str, ApiError> {
        if self.data.is_null() {
            return Ok("");
        }
        unsafe { CStr::from_ptr(self.data) }
            .to_str()
            .map_err(|e| ApiError::Deserialization(format!("response body is not UTF-8: {e}")))
    }
}

fn decode_payload(text: &str, response_type: ResponseType) -> Result<Value, ApiError> {
    match response_type {
        _ if text.is_empty() => Ok(Value::Null),
        ResponseType::Json => {
            serde_json::from_str(text).map_err(|e| ApiError::Deserialization(e.to_string()))
        }
        ResponseType::Text => Ok(Value::String(text.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error categories reported in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Token = 2,
    TokenRefresh = 3,
    Transport = 4,
    Serialization = 5,
    Deserialization = 6,
    InvalidMethod = 7,
    InvalidState = 8,
    Config = 9,
    Panic = 10,
    NullArg = 11,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Token(_) => FfiErrorCode::Token,
            ApiError::TokenRefresh(_) => FfiErrorCode::TokenRefresh,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::InvalidMethod(_) => FfiErrorCode::InvalidMethod,
            ApiError::InvalidState(_) => FfiErrorCode::InvalidState,
            ApiError::Config(_) => FfiErrorCode::Config,
        }
    }
}

/// Outcome of one call.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` holds
/// the payload as JSON text (a JSON string for text responses).
/// On failure `error_message` is a human-readable C string and `data` is
/// null; HTTP failures also fill `http_status` and `status_text`.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub status_text: *mut c_char,
    pub data: *mut c_char,
}

impl FfiResult {
    pub(crate) fn from_core(outcome: Result<Reply, ApiError>) -> *mut Self {
        match outcome {
            Ok(reply) => Self::ok(reply),
            Err(err) => Self::from_error(err),
        }
    }

    pub(crate) fn ok(reply: Reply) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: reply.status,
            status_text: c_string(reply.status_text),
            data: c_string(reply.data.to_string()),
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let status_text = match &err {
            ApiError::Http { status_text, .. } => c_string(status_text.as_str()),
            _ => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::from(&err),
            error_message: c_string(err.to_string()),
            http_status: err.status().unwrap_or(0),
            status_text,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: c_string(msg),
            http_status: 0,
            status_text: std::ptr::null_mut(),
            data: std::ptr::null_mut(),
        }))
    }

    /// Release a result produced by this module. Null is ignored.
    pub(crate) fn release(result: *mut Self) {
        if result.is_null() {
            return;
        }
        let result = unsafe { Box::from_raw(result) };
        drop_c_string(result.error_message);
        drop_c_string(result.status_text);
        drop_c_string(result.data);
    }
}

// ---------------------------------------------------------------------------
// Flow steps
// ---------------------------------------------------------------------------

/// Tag that tells the host what an `FfiStep` asks for.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStepKind {
    /// Fetch the current token, then call `linkapi_flow_on_token`.
    AcquireToken = 0,
    /// Execute `request`, then call `linkapi_flow_on_response`.
    Dispatch = 1,
    /// Refresh the token, then call `linkapi_flow_on_refresh`.
    RefreshToken = 2,
    /// The call is over; `result` holds the outcome.
    Done = 3,
}

/// The next action for the host. `request` is set only for `Dispatch` and
/// `result` only for `Done`; both are owned by the step.
#[repr(C)]
pub struct FfiStep {
    pub kind: FfiStepKind,
    pub request: *mut FfiHttpRequest,
    pub result: *mut FfiResult,
}

impl FfiStep {
    pub(crate) fn from_core(step: Step) -> *mut Self {
        let null_req = std::ptr::null_mut();
        let null_result = std::ptr::null_mut();
        let (kind, request, result) = match step {
            Step::AcquireToken => (FfiStepKind::AcquireToken, null_req, null_result),
            Step::Dispatch(req) => (
                FfiStepKind::Dispatch,
                FfiHttpRequest::from_core(req),
                null_result,
            ),
            Step::RefreshToken => (FfiStepKind::RefreshToken, null_req, null_result),
            Step::Done(outcome) => (FfiStepKind::Done, null_req, FfiResult::from_core(outcome)),
        };
        Box::into_raw(Box::new(FfiStep { kind, request, result }))
    }

    /// A terminal step carrying an already-built result.
    pub(crate) fn done(result: *mut FfiResult) -> *mut Self {
        Box::into_raw(Box::new(FfiStep {
            kind: FfiStepKind::Done,
            request: std::ptr::null_mut(),
            result,
        }))
    }

    pub(crate) fn release(step: *mut Self) {
        if step.is_null() {
            return;
        }
        let step = unsafe { Box::from_raw(step) };
        FfiHttpRequest::release(step.request);
        FfiResult::release(step.result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_string_strips_interior_nul() {
        let ptr = c_string("a\0b");
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        drop_c_string(ptr);
        assert_eq!(s, "ab");
    }

    #[test]
    fn read_str_handles_null() {
        assert_eq!(unsafe { read_str(std::ptr::null()) }, None);
    }

    #[test]
    fn error_codes_follow_error_kind() {
        let http = ApiError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert_eq!(FfiErrorCode::from(&http), FfiErrorCode::Http);
        assert_eq!(
            FfiErrorCode::from(&ApiError::TokenRefresh("x".to_string())),
            FfiErrorCode::TokenRefresh
        );
    }

    #[test]
    fn failed_envelope_ignores_payload() {
        let text = CString::new("Unauthorized").unwrap();
        let body = CString::new("not json").unwrap();
        let env = FfiResponseEnvelope {
            ok: false,
            status: 401,
            status_text: text.as_ptr(),
            data: body.as_ptr(),
        };
        let core = env.to_core(ResponseType::Json).unwrap();
        assert_eq!(core.status_text, "Unauthorized");
        assert_eq!(core.data, Value::Null);
    }

    #[test]
    fn successful_envelope_rejects_non_utf8_body() {
        let body = CString::new(&b"caf\xe9"[..]).unwrap();
        let text = CString::new(&b"O\xffK"[..]).unwrap();
        let env = FfiResponseEnvelope {
            ok: true,
            status: 200,
            status_text: text.as_ptr(),
            data: body.as_ptr(),
        };
        assert!(matches!(
            env.to_core(ResponseType::Text),
            Err(ApiError::Deserialization(_))
        ));

        let failed = FfiResponseEnvelope { ok: false, ..env };
        let core = failed.to_core(ResponseType::Text).unwrap();
        assert_eq!(core.status_text, "O\u{fffd}K");
        assert_eq!(core.data, Value::Null);
    }

    #[test]
    fn successful_json_envelope_must_decode() {
        let body = CString::new("{oops").unwrap();
        let env = FfiResponseEnvelope {
            ok: true,
            status: 200,
            status_text: std::ptr::null(),
            data: body.as_ptr(),
        };
        assert!(matches!(
            env.to_core(ResponseType::Json),
            Err(ApiError::Deserialization(_))
        ));
        assert_eq!(
            env.to_core(ResponseType::Text).unwrap().data,
            Value::String("{oops".to_string())
        );
    }
}

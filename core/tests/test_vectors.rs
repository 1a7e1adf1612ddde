//! Verify request building and the auth flow against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request vectors feed scripted parameter bags through `RequestSpec` and
//! compare the built request. Flow vectors replay scripted host responses
//! through `AuthFlow` and check the outcome together with how many
//! dispatches and refreshes it took.

use std::collections::VecDeque;

use linkapi_core::{
    build_request, ApiError, AuthFlow, HttpMethod, RequestSpec, ResponseEnvelope, Step, Token,
};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method: HttpMethod = case["method"].as_str().unwrap().parse().unwrap();
        let spec = RequestSpec::from_json(&case["params"].to_string()).unwrap();
        let expected = &case["expected"];

        let req = build_request(method, &spec).unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.body.as_deref(), expected["body"].as_str(), "{name}: body");
        assert_eq!(req.response_type.as_str(), expected["type"].as_str().unwrap(), "{name}: type");
        assert_eq!(req.timeout_ms, expected["timeout"].as_u64().unwrap(), "{name}: timeout");
    }
}

// ---------------------------------------------------------------------------
// Auth flow
// ---------------------------------------------------------------------------

struct Replay {
    outcome: Result<linkapi_core::Reply, ApiError>,
    dispatches: usize,
    refreshes: usize,
}

fn replay(mut responses: VecDeque<ResponseEnvelope>, refresh_fails: bool) -> Replay {
    let mut flow = AuthFlow::new(HttpMethod::Get, RequestSpec::new("https://api/x"));
    let mut dispatches = 0;
    let mut refreshes = 0;
    let mut step = flow.start();
    loop {
        step = match step {
            Step::AcquireToken => flow.on_token(Ok(Token::new("initial"))),
            Step::Dispatch(_) => {
                dispatches += 1;
                let envelope = responses.pop_front().expect("vector ran out of responses");
                flow.on_response(Ok(envelope))
            }
            Step::RefreshToken => {
                refreshes += 1;
                if refresh_fails {
                    flow.on_refresh(Err(ApiError::TokenRefresh("refresh rejected".to_string())))
                } else {
                    flow.on_refresh(Ok(Token::new("refreshed")))
                }
            }
            Step::Done(outcome) => {
                return Replay {
                    outcome,
                    dispatches,
                    refreshes,
                }
            }
        };
    }
}

#[test]
fn auth_flow_test_vectors() {
    let raw = include_str!("../../test-vectors/auth_flow.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let responses: VecDeque<ResponseEnvelope> =
            serde_json::from_value(case["responses"].clone()).unwrap();
        let refresh_fails = case["refresh_fails"].as_bool().unwrap();
        let expected = &case["expected"];

        let result = replay(responses, refresh_fails);
        assert_eq!(
            result.dispatches as u64,
            expected["dispatches"].as_u64().unwrap(),
            "{name}: dispatches"
        );
        assert_eq!(
            result.refreshes as u64,
            expected["refreshes"].as_u64().unwrap(),
            "{name}: refreshes"
        );

        match expected["outcome"].as_str().unwrap() {
            "ok" => {
                let reply = result
                    .outcome
                    .unwrap_or_else(|e| panic!("{name}: expected ok, got {e}"));
                assert_eq!(reply.data, expected["data"], "{name}: data");
            }
            "http_error" => {
                let err = result.outcome.expect_err(name);
                assert_eq!(
                    err.status(),
                    expected["status"].as_u64().map(|s| s as u16),
                    "{name}: status"
                );
            }
            "refresh_error" => {
                let err = result.outcome.expect_err(name);
                assert!(matches!(err, ApiError::TokenRefresh(_)), "{name}: {err:?}");
            }
            other => panic!("{name}: unknown outcome {other}"),
        }
    }
}

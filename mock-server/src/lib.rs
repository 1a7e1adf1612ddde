use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Token payload in the shape the host's token capability returns.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBody {
    pub access_token: String,
}

/// What a protected `/echo` call looked like from the server side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub params: Vec<(String, String)>,
    pub body: String,
    pub authorization: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub issued: u32,
    pub refreshes: u32,
    pub rejected: u32,
}

#[derive(Debug)]
struct GatewayState {
    token: String,
    stats: Stats,
}

/// Shared gateway state: the one currently valid access token.
#[derive(Clone, Debug)]
pub struct Gateway {
    inner: Arc<RwLock<GatewayState>>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(GatewayState {
                token: new_token(),
                stats: Stats::default(),
            })),
        }
    }

    pub async fn current_token(&self) -> String {
        self.inner.read().await.token.clone()
    }

    /// Invalidate the current token without telling any client.
    pub async fn expire(&self) {
        self.inner.write().await.token = new_token();
    }

    pub async fn stats(&self) -> Stats {
        self.inner.read().await.stats.clone()
    }

    async fn authorize(&self, headers: &HeaderMap) -> Result<Option<String>, StatusCode> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let mut state = self.inner.write().await;
        let expected = format!("Bearer {}", state.token);
        if presented.as_deref() == Some(expected.as_str()) {
            Ok(presented)
        } else {
            state.stats.rejected += 1;
            debug!("rejecting request with stale or missing bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn app() -> Router {
    app_with_gateway(Gateway::new())
}

pub fn app_with_gateway(gateway: Gateway) -> Router {
    Router::new()
        .route("/auth/token", get(issue_token))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/expire", post(expire_token))
        .route("/auth/stats", get(stats))
        .route("/echo", get(echo).post(echo).put(echo).delete(echo))
        .route("/status/{code}", get(status))
        .with_state(gateway)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_gateway(
    listener: TcpListener,
    gateway: Gateway,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_gateway(gateway)).await
}

async fn issue_token(State(gateway): State<Gateway>) -> Json<TokenBody> {
    let mut state = gateway.inner.write().await;
    state.stats.issued += 1;
    Json(TokenBody {
        access_token: state.token.clone(),
    })
}

async fn refresh_token(State(gateway): State<Gateway>) -> Json<TokenBody> {
    let mut state = gateway.inner.write().await;
    state.token = new_token();
    state.stats.refreshes += 1;
    info!(refreshes = state.stats.refreshes, "access token refreshed");
    Json(TokenBody {
        access_token: state.token.clone(),
    })
}

async fn expire_token(State(gateway): State<Gateway>) -> StatusCode {
    gateway.expire().await;
    info!("access token expired");
    StatusCode::NO_CONTENT
}

async fn stats(State(gateway): State<Gateway>) -> Json<Stats> {
    Json(gateway.stats().await)
}

async fn echo(
    State(gateway): State<Gateway>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Result<Json<Echo>, StatusCode> {
    let authorization = gateway.authorize(&headers).await?;
    Ok(Json(Echo {
        method: method.to_string(),
        params: parse_query(query.as_deref().unwrap_or("")),
        query,
        body,
        authorization,
    }))
}

async fn status(
    State(gateway): State<Gateway>,
    headers: HeaderMap,
    Path(code): Path<u16>,
) -> Result<StatusCode, StatusCode> {
    gateway.authorize(&headers).await?;
    Ok(StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST))
}

/// Split a raw query string into pairs, skipping empty segments.
fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}

//! Bearer-token authentication layer.
//!
//! Every request must carry `Authorization: Bearer <token>` matching one of
//! the configured access tokens. Tokens are compared in constant time.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower::{Layer, Service};
use tracing::warn;

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<Vec<String>>,
}

impl AuthLayer {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    tokens: Arc<Vec<String>>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if !is_authorized(&req, &self.tokens) {
            warn!(path = %req.uri().path(), "[kv-05] 🔒 Rejected unauthenticated request");
            let response = (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "errors": ["missing or invalid access token"] })),
            )
                .into_response();
            return Box::pin(async move { Ok(response) });
        }

        // The clone may not be ready; swap so the polled service handles this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

fn is_authorized<B>(req: &Request<B>, tokens: &[String]) -> bool {
    let Some(token) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return false;
    };

    // No early exit: every configured token is compared.
    tokens
        .iter()
        .fold(false, |found, expected| found | constant_time_compare(token, expected))
}

/// Constant-time string comparison.
///
/// Inputs are padded to a common length with different fill bytes, and the
/// length check is folded in, so a length mismatch costs the same as a
/// content mismatch.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::header::{ALLOW, CONTENT_TYPE, HeaderMap, HeaderValue};
use hyper::{Method, Request, Response as HttpResponse};
use std::{convert::Infallible, sync::Arc};
use tracing::info;

use crate::api::validation::parse_query;
use crate::api::{self, ApiError};
use crate::frontend::context::FrontendContext;
use crate::frontend::server_state::ServerState;
use crate::shared::response::{JsonRenderer, Renderer, Response, StatusCode};

use super::cors::{apply_cors, preflight_headers};
use super::router::Route;

/// Holds the in-flight slot for as long as the request is being served.
struct InflightGuard<'a>(&'a ServerState);

impl<'a> InflightGuard<'a> {
    fn enter(state: &'a ServerState) -> Self {
        state.increment_pending();
        Self(state)
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.0.decrement_pending();
    }
}

pub struct HttpHandler {
    ctx: Arc<FrontendContext>,
    renderer: Arc<dyn Renderer>,
}

impl HttpHandler {
    pub fn new(ctx: Arc<FrontendContext>) -> Self {
        Self {
            ctx,
            renderer: Arc::new(JsonRenderer),
        }
    }

    /// Routes one request to its service and folds any error into a response.
    pub async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> Response {
        match self.route(method, path, query, body).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    async fn route(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> Result<Response, ApiError> {
        let Some(route) = Route::resolve(path) else {
            return Err(ApiError::not_found(format!(
                "Not found: {}",
                request_target(path, query)
            )));
        };
        if !route.allows(method) {
            return Err(ApiError::method_not_allowed(
                method.as_str(),
                &request_target(path, query),
            ));
        }

        let db = &self.ctx.db;
        match route {
            Route::Movies => api::movies::list(db, &parse_query(query)).await,
            Route::Movie(id) => api::movies::read(db, &id).await,
            Route::MovieTheaters(id) => api::movies::theaters(db, &id).await,
            Route::MovieReviews(id) => api::movies::reviews(db, &id).await,
            Route::Theaters => api::theaters::list(db).await,
            Route::Review(id) if *method == Method::PUT => {
                api::reviews::update(db, &id, body).await
            }
            Route::Review(id) => api::reviews::destroy(db, &id).await,
        }
    }

    /// Renders `response` for the wire. HEAD answers keep their headers but
    /// drop the body.
    pub fn into_http(&self, method: &Method, path: &str, response: Response) -> HttpResponse<String> {
        let status = response.status;
        let rendered = self.renderer.render(&response);
        let has_body = !rendered.is_empty();
        let body = if *method == Method::HEAD {
            String::new()
        } else {
            String::from_utf8_lossy(&rendered).into_owned()
        };

        let mut http = HttpResponse::new(body);
        *http.status_mut() = status.into();
        let headers = http.headers_mut();
        apply_cors(headers);
        if has_body {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(self.renderer.content_type()),
            );
        }
        if status == StatusCode::MethodNotAllowed {
            if let Some(route) = Route::resolve(path) {
                headers.insert(ALLOW, HeaderValue::from_static(route.allow_header()));
            }
        }
        http
    }

    async fn handle(&self, req: Request<Incoming>) -> Result<HttpResponse<String>, Infallible> {
        let (parts, incoming) = req.into_parts();
        let path = parts.uri.path();

        if parts.method == Method::OPTIONS {
            return Ok(preflight(&parts.headers));
        }

        let state = &self.ctx.server_state;
        let response = match admit(state) {
            Err(err) => err.into_response(),
            Ok(()) => {
                let _inflight = InflightGuard::enter(state);
                match read_body(incoming, self.ctx.max_body_bytes).await {
                    Ok(body) => {
                        self.dispatch(&parts.method, path, parts.uri.query(), &body)
                            .await
                    }
                    Err(err) => err.into_response(),
                }
            }
        };

        info!(
            target: "marquee::http",
            method = %parts.method,
            path = %path,
            status = response.status.code(),
            "Handled request"
        );
        Ok(self.into_http(&parts.method, path, response))
    }
}

/// 503 while shutting down or when too many requests are in flight.
pub fn admit(state: &ServerState) -> Result<(), ApiError> {
    if state.is_shutting_down() {
        return Err(ApiError::Unavailable("Server is shutting down".to_string()));
    }
    if state.is_under_pressure() {
        return Err(ApiError::Unavailable(
            "Server is under pressure, please retry later".to_string(),
        ));
    }
    Ok(())
}

/// Answers a CORS preflight with an empty 204.
pub fn preflight(request_headers: &HeaderMap) -> HttpResponse<String> {
    let mut http = HttpResponse::new(String::new());
    *http.status_mut() = hyper::StatusCode::NO_CONTENT;
    *http.headers_mut() = preflight_headers(request_headers);
    http
}

/// Collects at most `limit` bytes of `body`.
pub async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::PayloadTooLarge(limit))
        }
        Err(err) => Err(ApiError::bad_request(format!(
            "Failed to read request body: {err}"
        ))),
    }
}

fn request_target(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

pub async fn handle_request(
    req: Request<Incoming>,
    ctx: Arc<FrontendContext>,
) -> Result<HttpResponse<String>, Infallible> {
    let handler = HttpHandler::new(ctx);
    handler.handle(req).await
}

//! HTTP/JSON API: transport-decoupled request routing.
//!
//! The HTTP server adapter hands each request over as a [`Request`]
//! (method, URI, body bytes) and writes back the [`Response`] it gets.
//! Everything between (route matching, method and body validation,
//! command dispatch, status rendering) lives here and runs on the host.
//!
//! Two routers exist:
//!
//! - [`dispatch`]: the relay API served in station mode.
//! - [`portal::dispatch`]: the configuration portal served while the
//!   board runs its own access point.

pub mod handlers;
pub mod portal;
pub mod routes;

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, NetworkPort, RelayPort, StoragePort};
use crate::app::service::AppService;
use crate::error::ApiError;

use routes::Route;

pub const CONTENT_TYPE: &str = "application/json";

// ───────────────────────────────────────────────────────────────
// Request / response
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub method: Method,
    /// Request target as received, query string included.
    pub uri: &'a str,
    pub body: &'a [u8],
}

impl<'a> Request<'a> {
    pub fn new(method: Method, uri: &'a str, body: &'a [u8]) -> Self {
        Self { method, uri, body }
    }

    /// URI without the query string.
    pub fn path(&self) -> &'a str {
        self.uri.split_once('?').map_or(self.uri, |(p, _)| p)
    }
}

/// Always `application/json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    pub fn error(e: ApiError) -> Self {
        Self {
            status: e.status(),
            body: e.body().to_string(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Relay API router
// ───────────────────────────────────────────────────────────────

/// Route and handle one request against the relay API.
///
/// Runs to completion before returning; the caller serialises requests.
pub fn dispatch(
    req: &Request<'_>,
    app: &mut AppService,
    relays: &mut impl RelayPort,
    net: &mut impl NetworkPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> Response {
    let result = Route::resolve(req.path(), req.method).and_then(|route| match route {
        Route::Infos => Ok(()),
        Route::Control => handlers::control(req.body, app, relays, net, storage, sink),
        Route::Hostname => handlers::hostname(req.body, app, relays, net, storage, sink),
        Route::DefaultState => handlers::default_state(req.body, app, relays, net, storage, sink),
    });

    match result {
        Ok(()) => Response::ok(app.status(net).to_json()),
        Err(e) => {
            debug!("HTTP: {:?} {}", req.method, req.path());
            sink.emit(&AppEvent::RequestRejected(e));
            Response::error(e)
        }
    }
}

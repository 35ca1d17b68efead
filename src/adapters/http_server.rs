//! HTTP server adapter (ESP-IDF only).
//!
//! One wildcard handler per method feeds every request into
//! [`Board::handle`].  The board sits behind a mutex; the ESP-IDF httpd
//! runs handlers on a single task, so requests are already serialised and
//! the lock is never contended by another request.
//!
//! Bodies are read up to one byte past [`MAX_BODY_LEN`] so an oversized
//! body reaches the router as oversized and is rejected there.

use std::sync::{Arc, Mutex};

use esp_idf_svc::http::Method as HttpMethod;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::{Read, Write};
use esp_idf_svc::sys::EspError;
use log::info;

use crate::api::{CONTENT_TYPE, Method, Request};
use crate::app::ports::{EventSink, NetworkPort, RelayPort, StoragePort};
use crate::board::Board;
use crate::config::MAX_BODY_LEN;

const METHODS: [(HttpMethod, Method); 7] = [
    (HttpMethod::Get, Method::Get),
    (HttpMethod::Post, Method::Post),
    (HttpMethod::Put, Method::Put),
    (HttpMethod::Patch, Method::Patch),
    (HttpMethod::Delete, Method::Delete),
    (HttpMethod::Head, Method::Head),
    (HttpMethod::Options, Method::Options),
];

/// Start the server on `port` and register the wildcard handlers.
///
/// The returned server must be kept alive; dropping it stops httpd.
pub fn start<R, N, S, E>(
    board: Arc<Mutex<Board<R, N, S, E>>>,
    port: u16,
) -> Result<EspHttpServer<'static>, EspError>
where
    R: RelayPort + Send + 'static,
    N: NetworkPort + Send + 'static,
    S: StoragePort + Send + 'static,
    E: EventSink + Send + 'static,
{
    let mut server = EspHttpServer::new(&Configuration {
        http_port: port,
        uri_match_wildcard: true,
        ..Default::default()
    })?;

    for (http_method, method) in METHODS {
        let board = board.clone();
        server.fn_handler::<anyhow::Error, _>("/*", http_method, move |mut req| {
            let uri = req.uri().to_string();

            let mut body = Vec::with_capacity(256);
            let mut chunk = [0u8; 256];
            while body.len() <= MAX_BODY_LEN {
                let n = req.read(&mut chunk)?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..n]);
            }
            body.truncate(MAX_BODY_LEN + 1);

            let response = {
                let mut board = board
                    .lock()
                    .map_err(|_| anyhow::anyhow!("board mutex poisoned"))?;
                board.handle(&Request::new(method, &uri, &body))
            };

            let mut resp = req.into_response(
                response.status,
                None,
                &[("Content-Type", CONTENT_TYPE)],
            )?;
            resp.write_all(response.body.as_bytes())?;
            Ok(())
        })?;
    }

    info!("HTTP: server listening on port {}", port);
    Ok(server)
}


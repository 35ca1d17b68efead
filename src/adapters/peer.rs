//! HTTP client for the peer state service.
//!
//! Implements [`PeerPort`]: one GET, one attempt, bounded by the caller's
//! timeout.  The body is read into the caller's buffer; anything that does
//! not fit is [`PeerError::BodyTooLarge`].

use log::debug;

use crate::app::ports::{PeerError, PeerPort};

#[cfg(target_os = "espidf")]
mod platform {
    use core::time::Duration;

    use embedded_svc::http::client::Client;
    use embedded_svc::http::Status;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use esp_idf_svc::io::{EspIOError, Read};
    use esp_idf_svc::sys::{ESP_ERR_HTTP_EAGAIN, ESP_ERR_TIMEOUT};

    use super::PeerError;

    fn classify(e: EspIOError) -> PeerError {
        let code = e.0.code();
        if code == ESP_ERR_TIMEOUT || code == ESP_ERR_HTTP_EAGAIN {
            PeerError::Timeout
        } else {
            log::debug!("Peer: transport error {}", e);
            PeerError::Transport
        }
    }

    pub fn get(url: &str, timeout_ms: u32, buf: &mut [u8]) -> Result<usize, PeerError> {
        let conn = EspHttpConnection::new(&Configuration {
            timeout: Some(Duration::from_millis(u64::from(timeout_ms))),
            ..Default::default()
        })
        .map_err(|e| classify(e.into()))?;
        let mut client = Client::wrap(conn);

        let request = client.get(url).map_err(classify)?;
        let mut response = request.submit().map_err(classify)?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(PeerError::Status(status));
        }

        let mut len = 0;
        while len < buf.len() {
            match response.read(&mut buf[len..]).map_err(classify)? {
                0 => return Ok(len),
                n => len += n,
            }
        }
        let mut probe = [0u8; 1];
        match response.read(&mut probe).map_err(classify)? {
            0 => Ok(len),
            _ => Err(PeerError::BodyTooLarge),
        }
    }
}

/// Peer client.  On host builds it serves a canned body instead of
/// touching the network.
#[derive(Default)]
pub struct HttpPeer {
    #[cfg(not(target_os = "espidf"))]
    canned: Option<String>,
}

impl HttpPeer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation: answer every GET with `body`.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_response(body: &str) -> Self {
        Self {
            canned: Some(body.to_string()),
        }
    }
}

impl PeerPort for HttpPeer {
    fn get(&mut self, url: &str, timeout_ms: u32, buf: &mut [u8]) -> Result<usize, PeerError> {
        debug!("Peer: GET {} (timeout {} ms)", url, timeout_ms);

        #[cfg(target_os = "espidf")]
        {
            platform::get(url, timeout_ms, buf)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let body = self.canned.as_deref().ok_or(PeerError::Transport)?;
            if body.len() > buf.len() {
                return Err(PeerError::BodyTooLarge);
            }
            buf[..body.len()].copy_from_slice(body.as_bytes());
            Ok(body.len())
        }
    }
}

//! Remote calendar adapter.
//!
//! Implements [`CalendarPort`] by issuing an HTTPS GET to a web endpoint
//! whose body is the literal `true` (today is a lock day) or `false`.
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the ESP-IDF
//!   certificate bundle, a hard timeout and manual redirect following
//!   (script hosts answer with a 302 to the real content URL).
//! - **all other targets**: a settable simulated answer.
//!
//! Any transport error, non-2xx status or unexpected body maps to
//! [`RemoteUnavailable`]; the cache above decides what that means.

use log::{debug, warn};

use crate::app::ports::CalendarPort;
use crate::error::RemoteUnavailable;

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::Method;

/// Longest body we bother reading.  Valid answers are five bytes.
const MAX_BODY_LEN: usize = 64;

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const MAX_REDIRECTS: u8 = 5;

/// Interpret an HTTP response from the calendar endpoint.
///
/// Surrounding ASCII whitespace is ignored; anything other than exactly
/// `true` or `false` is treated as unavailable.
pub fn parse_calendar_payload(status: u16, body: &[u8]) -> Result<bool, RemoteUnavailable> {
    if !(200..300).contains(&status) {
        warn!("Calendar: HTTP status {}", status);
        return Err(RemoteUnavailable);
    }
    match body.trim_ascii() {
        b"true" => Ok(true),
        b"false" => Ok(false),
        other => {
            warn!("Calendar: unexpected payload ({} bytes)", other.len());
            Err(RemoteUnavailable)
        }
    }
}

pub struct HttpCalendarAdapter {
    url: heapless::String<160>,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    timeout: core::time::Duration,
    #[cfg(not(target_os = "espidf"))]
    sim_answer: Option<bool>,
}

impl HttpCalendarAdapter {
    pub fn new(url: &str, timeout: core::time::Duration) -> Self {
        let mut stored = heapless::String::new();
        if stored.push_str(url).is_err() {
            warn!("Calendar: URL longer than {} bytes, ignoring", stored.capacity());
        }
        Self {
            url: stored,
            timeout,
            #[cfg(not(target_os = "espidf"))]
            sim_answer: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Simulation: answer every query with `answer` (`None` = unreachable).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_answer(&mut self, answer: Option<bool>) {
        self.sim_answer = answer;
    }

    #[cfg(target_os = "espidf")]
    fn fetch(&self) -> Result<(u16, heapless::Vec<u8, MAX_BODY_LEN>), RemoteUnavailable> {
        let config = Configuration {
            timeout: Some(self.timeout),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let mut conn = EspHttpConnection::new(&config).map_err(|e| {
            warn!("Calendar: HTTP client init failed: {}", e);
            RemoteUnavailable
        })?;

        let mut location: heapless::String<512> = heapless::String::new();
        location
            .push_str(&self.url)
            .map_err(|_| RemoteUnavailable)?;

        for _ in 0..=MAX_REDIRECTS {
            conn.initiate_request(Method::Get, &location, &[])
                .and_then(|()| conn.initiate_response())
                .map_err(|e| {
                    warn!("Calendar: request failed: {}", e);
                    RemoteUnavailable
                })?;

            let status = conn.status();
            if (300..400).contains(&status) {
                let next = conn.header("Location").ok_or(RemoteUnavailable)?;
                debug!("Calendar: redirect {} -> {}", status, next);
                let mut target = heapless::String::new();
                target.push_str(next).map_err(|_| RemoteUnavailable)?;
                location = target;
                continue;
            }

            let mut body = heapless::Vec::new();
            let mut buf = [0u8; MAX_BODY_LEN];
            loop {
                let n = conn.read(&mut buf).map_err(|_| RemoteUnavailable)?;
                if n == 0 {
                    break;
                }
                let room = body.capacity() - body.len();
                // Oversized bodies are invalid anyway; keep what fits.
                let _ = body.extend_from_slice(&buf[..n.min(room)]);
                if n > room {
                    break;
                }
            }
            return Ok((status, body));
        }

        warn!("Calendar: too many redirects");
        Err(RemoteUnavailable)
    }

    #[cfg(not(target_os = "espidf"))]
    fn fetch(&self) -> Result<(u16, heapless::Vec<u8, MAX_BODY_LEN>), RemoteUnavailable> {
        let answer = self.sim_answer.ok_or(RemoteUnavailable)?;
        let body: &[u8] = if answer { b"true" } else { b"false" };
        let mut out = heapless::Vec::new();
        out.extend_from_slice(body).map_err(|_| RemoteUnavailable)?;
        Ok((200, out))
    }
}

impl CalendarPort for HttpCalendarAdapter {
    fn query(&mut self) -> Result<bool, RemoteUnavailable> {
        if self.url.is_empty() {
            warn!("Calendar: no endpoint configured");
            return Err(RemoteUnavailable);
        }
        let (status, body) = self.fetch()?;
        let verdict = parse_calendar_payload(status, &body)?;
        debug!("Calendar: lock today = {}", verdict);
        Ok(verdict)
    }
}

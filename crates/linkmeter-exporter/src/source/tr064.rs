//! TR-064 counter source.
//!
//! Queries a router's WAN common interface byte counters over UPnP SOAP.
//! Tries the `WANCommonInterfaceConfig:1` service first and falls back to
//! the legacy `WANCommonIFC1` IGD endpoint for older firmware. The counters
//! are 32-bit and wrap; the sampler upstream handles that.

use std::time::Duration;

use async_trait::async_trait;

use linkmeter_core::error::{LinkMeterError, Result};
use linkmeter_core::sampler::{CounterReading, CounterSource};

use crate::config::SourceConfig;

const MODERN_CONTROL: &str = "/upnp/control/wancommonifconfig1";
const MODERN_SERVICE: &str = "urn:dslforum-org:service:WANCommonInterfaceConfig:1";
const LEGACY_CONTROL: &str = "/igdupnp/control/WANCommonIFC1";
const LEGACY_SERVICE: &str = "urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1";

pub struct Tr064Source {
    http: reqwest::Client,
    base: String,
    password: Option<String>,
}

impl Tr064Source {
    pub fn new(cfg: &SourceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| LinkMeterError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base: format!("http://{}:49000", cfg.address),
            password: cfg.password.clone(),
        })
    }

    async fn call_action(&self, action: &str, field: &str) -> Result<u32> {
        match self
            .call_service(MODERN_CONTROL, MODERN_SERVICE, action, field)
            .await
        {
            Ok(v) => Ok(v),
            // Older firmware only serves the IGD endpoint.
            Err(LinkMeterError::Protocol(_)) => {
                self.call_service(LEGACY_CONTROL, LEGACY_SERVICE, action, field)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn call_service(
        &self,
        control: &str,
        service: &str,
        action: &str,
        field: &str,
    ) -> Result<u32> {
        let body = format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" "#,
                r#"s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
                r#"<s:Body><u:{action} xmlns:u="{service}"/></s:Body></s:Envelope>"#
            ),
            action = action,
            service = service,
        );

        let mut request = self
            .http
            .post(format!("{}{}", self.base, control))
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            .header("SoapAction", format!("\"{service}#{action}\""))
            .body(body);
        if let Some(password) = &self.password {
            request = request.basic_auth("admin", Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| LinkMeterError::SourceUnavailable(format!("{}: {e}", self.base)))?;
        if !response.status().is_success() {
            return Err(LinkMeterError::Protocol(format!(
                "{action} returned {}",
                response.status()
            )));
        }
        let text = response
            .text()
            .await
            .map_err(|e| LinkMeterError::SourceUnavailable(format!("read body: {e}")))?;
        extract_field(&text, field)
    }
}

#[async_trait]
impl CounterSource for Tr064Source {
    async fn fetch(&self) -> Result<Vec<CounterReading>> {
        let recv = self
            .call_action("GetTotalBytesReceived", "NewTotalBytesReceived")
            .await?;
        let sent = self
            .call_action("GetTotalBytesSent", "NewTotalBytesSent")
            .await?;
        Ok(vec![
            CounterReading::new("recv_bytes", recv),
            CounterReading::new("sent_bytes", sent),
        ])
    }
}

/// Pull `<field>value</field>` out of a SOAP response without a full XML
/// parse; the counter payloads are flat decimal text.
fn extract_field(xml: &str, field: &str) -> Result<u32> {
    let open = format!("<{field}>");
    let close = format!("</{field}>");
    let start = xml
        .find(&open)
        .map(|i| i + open.len())
        .ok_or_else(|| LinkMeterError::Protocol(format!("missing {field} in response")))?;
    let end = xml[start..]
        .find(&close)
        .map(|i| start + i)
        .ok_or_else(|| LinkMeterError::Protocol(format!("unterminated {field} in response")))?;
    xml[start..end]
        .trim()
        .parse::<u32>()
        .map_err(|e| LinkMeterError::Protocol(format!("{field} is not a uint32: {e}")))
}

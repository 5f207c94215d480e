//! Node RPC endpoint
//!
//! The endpoint is parsed once from configuration and then shared read-only
//! by every component of a run. Substrate nodes serve HTTP and WebSocket
//! JSON-RPC on the same port, so `ws://`/`wss://` inputs are accepted and
//! mapped to `http://`/`https://` for request/response calls.

use std::fmt;

use url::Url;

/// Polkadot.js apps base URL used for the report footer link.
const POLKADOT_JS_APPS: &str = "https://polkadot.js.org/apps/";

/// Endpoint parse errors
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid endpoint URL {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported endpoint scheme {0:?} (expected http, https, ws or wss)")]
    UnsupportedScheme(String),

    #[error("endpoint {0:?} has no host")]
    MissingHost(String),
}

/// RPC target address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse an endpoint URL.
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let mut url = Url::parse(input.trim()).map_err(|source| EndpointError::Parse {
            input: input.to_string(),
            source,
        })?;

        let http_scheme = match url.scheme() {
            "http" | "ws" => "http",
            "https" | "wss" => "https",
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        };

        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(input.to_string()));
        }

        if url.scheme() != http_scheme {
            // http <-> ws are both "special" schemes, so this cannot fail.
            let _ = url.set_scheme(http_scheme);
        }

        Ok(Self { url })
    }

    /// URL requests are POSTed to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Scheme (`http` or `https`).
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host name or address.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Port, falling back to the scheme default.
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    /// WebSocket form of the endpoint, as used by wallets and explorers.
    pub fn ws_url(&self) -> String {
        let mut ws = self.display_url();
        let scheme = if self.url.scheme() == "https" { "wss" } else { "ws" };
        let _ = ws.set_scheme(scheme);
        trim_root_slash(ws.as_str())
    }

    /// Polkadot.js apps link pointed at this endpoint.
    pub fn polkadot_js_link(&self) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(self.ws_url().as_bytes()).collect();
        format!("{}?rpc={}", POLKADOT_JS_APPS, encoded)
    }

    /// URL with any userinfo password redacted, for logs and reports.
    pub fn display_url(&self) -> Url {
        let mut shown = self.url.clone();
        if shown.password().is_some() {
            let _ = shown.set_password(Some("REDACTED"));
        }
        shown
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&trim_root_slash(self.display_url().as_str()))
    }
}

fn trim_root_slash(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

// Backend discovery: the backend is exposed through a local tunnel agent,
// and its public URL is read from the agent's inspection API at startup.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TunnelList {
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    public_url: String,
}

/// Prefix `https://` when the URL carries no http(s) scheme.
pub fn normalize_public_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Query the tunnel-inspection endpoint and return the first tunnel's
/// public URL.
pub fn discover_backend_url(client: &Client, inspect_url: &str) -> Result<String> {
    debug!(inspect_url, "querying tunnel inspection endpoint");
    let res = client
        .get(inspect_url)
        .send()
        .map_err(|e| Error::discovery(format!("could not reach {}: {}", inspect_url, e)))?;
    let body = res
        .text()
        .map_err(|e| Error::discovery(format!("could not read tunnel list: {}", e)))?;
    let list: TunnelList = serde_json::from_str(&body)
        .map_err(|e| Error::discovery(format!("unexpected tunnel list: {}", e)))?;

    let first = list
        .tunnels
        .into_iter()
        .next()
        .ok_or_else(|| Error::discovery("no tunnels are running"))?;
    let url = normalize_public_url(&first.public_url);
    info!(backend_url = %url, "discovered backend");
    Ok(url)
}

/// Use the configured backend URL when there is one, otherwise ask the
/// tunnel agent.
pub fn resolve_backend_url(client: &Client, config: &Config) -> Result<String> {
    match &config.backend_url {
        Some(url) => {
            debug!(backend_url = %url, "using configured backend");
            Ok(normalize_public_url(url))
        }
        None => discover_backend_url(client, &config.tunnel_api_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_added_when_missing() {
        assert_eq!(
            normalize_public_url("abc123.ngrok-free.app"),
            "https://abc123.ngrok-free.app"
        );
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        assert_eq!(normalize_public_url("https://a.example"), "https://a.example");
        assert_eq!(normalize_public_url("http://localhost:8000"), "http://localhost:8000");
    }
}

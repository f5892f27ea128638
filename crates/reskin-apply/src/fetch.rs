//! Remote asset fetching.

use std::io::Read;

/// Errors that can occur while fetching a remote asset.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// Source of remote bytes.
pub trait Fetcher {
    /// Download `url` fully into memory.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Plain unauthenticated blocking HTTP GET.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("reskin/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Port 9 on localhost is not expected to serve HTTP.
        let err = HttpFetcher::new()
            .fetch("http://127.0.0.1:9/cursor.png")
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[test]
    fn errors_name_the_url() {
        let err = FetchError::Status {
            url: "https://example.com/a.png".to_string(),
            status: 404,
        };

        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/a.png");
    }
}

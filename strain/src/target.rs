//! Endpoints a worker can call.
use crate::error::{RunError, TransportError};
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::future::Future;
use strain_core::{RunConfig, NAME_ROSTER};

/// Request body posted on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub name: String,
}

impl Payload {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Pick a name from the fixed test roster.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // NOTE: The roster is a non-empty constant.
        let name = NAME_ROSTER.choose(rng).copied().unwrap_or(NAME_ROSTER[0]);
        Self::new(name)
    }
}

/// Something a worker posts payloads to.
///
/// Implementations return the HTTP status of the response, or a [`TransportError`] when no
/// response was received at all. Only transport failures count as errors here; any status code,
/// including 5xx, is a successful call from the target's point of view.
pub trait Target: Send + Sync + 'static {
    fn post(
        &self,
        payload: &Payload,
    ) -> impl Future<Output = Result<u16, TransportError>> + Send;
}

/// Target backed by a real HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTarget {
    client: Client,
    url: Url,
}

impl HttpTarget {
    pub fn new(config: &RunConfig) -> Result<Self, RunError> {
        let client = Client::builder()
            .default_headers(headers(&config.auth_token)?)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.target_url.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Target for HttpTarget {
    async fn post(&self, payload: &Payload) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

fn headers(auth_token: &str) -> Result<HeaderMap, RunError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {auth_token}"))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn payload_from_roster() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let payload = Payload::random(&mut rng);
            assert!(NAME_ROSTER.contains(&payload.name.as_str()));
        }
    }

    #[test]
    fn payload_wire_format() {
        let body = serde_json::to_string(&Payload::new("Sue")).unwrap();
        assert_eq!(body, r#"{"name":"Sue"}"#);
    }

    #[test]
    fn builds_headers() {
        let headers = headers("abc123").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn keeps_target_url() {
        let config = RunConfig::new("https://scoring.internal:8443/v1/score", "key").unwrap();
        let target = HttpTarget::new(&config).unwrap();
        assert_eq!(target.url().as_str(), "https://scoring.internal:8443/v1/score");
        assert_eq!(target.url().port(), Some(8443));
    }

    #[test]
    fn rejects_unprintable_key() {
        assert!(matches!(headers("bad\nkey"), Err(RunError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // NOTE: Port 1 is reserved (tcpmux) and not expected to be listening.
        let config = RunConfig::new("http://127.0.0.1:1/score", "key")
            .unwrap()
            .request_timeout(std::time::Duration::from_secs(2));
        let target = HttpTarget::new(&config).unwrap();

        let res = target.post(&Payload::new("Dave")).await;
        assert!(matches!(res, Err(TransportError::Http(_))));
    }
}

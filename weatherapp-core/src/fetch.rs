use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    error::{Error, NetworkError, Result},
    settings::Settings,
};

/// "GET this url, give me the body". The only place the core touches the network.
#[async_trait]
pub trait PageFetcher: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| {
                Error::Network(NetworkError::Request { url: String::new(), message: err.to_string() })
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        debug!(url, "Requesting page");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| NetworkError::from_reqwest(url, err))?;

        let status = res.status();
        if !status.is_success() {
            return Err(NetworkError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = res.bytes().await.map_err(|err| NetworkError::from_reqwest(url, err))?;
        Ok(body.to_vec())
    }
}

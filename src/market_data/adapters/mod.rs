// Shared transport seam for market data adapters

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::BoxError;

// Status plus body. The body is only read for 200 OK.
#[derive(Debug)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, BoxError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, BoxError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = if status == StatusCode::OK {
            res.bytes().await?.to_vec()
        } else {
            Vec::new()
        };
        Ok(HttpReply { status, body })
    }
}

pub mod cryptsy;
pub mod cryptsy_types;

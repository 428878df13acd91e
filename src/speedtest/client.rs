//! HTTP transfers used by the bandwidth test

use crate::error::{AppError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{multipart, Client, Response, Url};
use std::time::Duration;

/// Multipart field carrying the upload block
pub const UPLOAD_FIELD: &str = "file";
/// File name attached to the upload block
pub const UPLOAD_FILE_NAME: &str = "testfile.dat";

/// Transfers the sampler needs from a test server
#[async_trait]
pub trait ThroughputClient: Send + Sync {
    /// One request to the latency probe
    async fn ping(&self) -> Result<()>;

    /// Download one block, reporting each received chunk length
    async fn download_block(
        &self,
        size: usize,
        on_chunk: &mut (dyn FnMut(usize) + Send),
    ) -> Result<u64>;

    /// Upload one block and wait for the server to accept it
    async fn upload_block(&self, block: Vec<u8>) -> Result<()>;
}

/// reqwest-backed client for the site's test endpoints
pub struct HttpThroughputClient {
    client: Client,
    ping_url: Url,
    download_url: Url,
    upload_url: Url,
}

impl HttpThroughputClient {
    /// Create a client against a base URL such as `http://127.0.0.1:3000`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(AppError::validation(format!("Unsupported URL scheme: {}", base.scheme())));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ping_url: base.join("/api/ping")?,
            download_url: base.join("/api/download")?,
            upload_url: base.join("/api/upload-test")?,
        })
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!(
                "{} returned status {}",
                response.url().path(),
                status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl ThroughputClient for HttpThroughputClient {
    async fn ping(&self) -> Result<()> {
        let response = self.client.get(self.ping_url.clone()).send().await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn download_block(
        &self,
        size: usize,
        on_chunk: &mut (dyn FnMut(usize) + Send),
    ) -> Result<u64> {
        let response = self
            .client
            .get(self.download_url.clone())
            .query(&[("bytes", size)])
            .send()
            .await?;
        let response = Self::check_status(response)?;

        let mut received = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            received += chunk.len() as u64;
            on_chunk(chunk.len());
        }

        Ok(received)
    }

    async fn upload_block(&self, block: Vec<u8>) -> Result<()> {
        let part = multipart::Part::bytes(block)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }
}

// API client module: contains a small blocking HTTP client that talks to
// the analyzer server. One request per audio file, multipart body, no
// session state.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use tracing::debug;

use crate::config::AnalysisMetadata;

/// Simple API client that holds a reqwest blocking client and the URL of
/// the server's `/analyze` route.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    /// Create a client posting to `http://{host}:{port}/analyze`.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            url: format!("http://{}:{}/analyze", host, port),
        })
    }

    /// Endpoint URL the client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit one audio file for analysis.
    ///
    /// The multipart body carries two parts: `audio` with the file's base
    /// name and raw bytes, and `meta` with the JSON-serialized metadata as
    /// a plain form field. The file is read before the clock starts, so
    /// the returned duration covers the network round trip only.
    ///
    /// The server's HTTP status is not inspected; whatever body comes back
    /// is decoded as JSON, and a non-JSON body surfaces as an error.
    pub fn analyze(
        &self,
        path: &Path,
        metadata: &AnalysisMetadata,
    ) -> Result<(serde_json::Value, String, Duration)> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
            .to_string();
        let mdata = serde_json::to_string(metadata).context("Serializing analysis metadata")?;
        debug!(file = %file_name, bytes = bytes.len(), url = %self.url, "Uploading audio file");

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new()
            .part("audio", part)
            .text("meta", mdata);

        let start = Instant::now();
        let res = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .context("Failed to send analysis request")?;
        let text = res.text().context("Failed to read response body")?;
        let elapsed = start.elapsed();

        let data: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Response for {} is not valid JSON", path.display()))?;
        Ok((data, text, elapsed))
    }
}

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use cy_core::config::AccountConfig;
use cy_core::ports::{ClipboardTransportPort, TransportError};
use cy_core::{RemoteClipboardEntry, RemoteContent};

use super::disposition::resolve_file_name;
use super::wire::{CopyTextRequest, LatestMetadata};

const APP_KEY_HEADER: &str = "AppKey";
const COPY_PATH: &str = "/app/copy";
const LATEST_PATH: &str = "/app/paste/latest";

pub struct ReqwestClipboardTransport {
    client: Client,
    base_url: String,
    app_key: String,
    timeout: Duration,
}

impl ReqwestClipboardTransport {
    /// `timeout` bounds JSON requests end to end. Binary transfers are only
    /// bounded per read so large files are not cut off.
    pub fn new(account: &AccountConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: account.api_base_url.trim_end_matches('/').to_string(),
            app_key: account.app_key.clone(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .header(APP_KEY_HEADER, &self.app_key)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Server {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn read_binary(&self, response: Response) -> Result<RemoteContent, TransportError> {
        let content_type = header_str(response.headers(), CONTENT_TYPE);
        let disposition = header_str(response.headers(), CONTENT_DISPOSITION);
        let bytes = response.bytes().await.map_err(network_error)?.to_vec();

        debug!(
            content_type = content_type.as_deref().unwrap_or("-"),
            size = bytes.len(),
            "Fetched binary clipboard content"
        );

        let is_image = content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"));
        if is_image {
            return Ok(RemoteContent::Image {
                bytes,
                mime: content_type,
            });
        }

        Ok(RemoteContent::File {
            name: resolve_file_name(disposition.as_deref(), content_type.as_deref()),
            bytes,
            mime: content_type,
        })
    }
}

#[async_trait]
impl ClipboardTransportPort for ReqwestClipboardTransport {
    async fn upload_text(&self, text: &str) -> Result<(), TransportError> {
        let request = self
            .client
            .post(self.url(COPY_PATH))
            .timeout(self.timeout)
            .json(&CopyTextRequest { text });

        self.send(request).await?;
        debug!(chars = text.chars().count(), "Uploaded text");
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<(), TransportError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| file_error(path, err))?;
        let meta = file.metadata().await.map_err(|err| file_error(path, err))?;
        if !meta.is_file() {
            return Err(TransportError::Io(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let part = Part::stream_with_length(Body::from(file), meta.len())
            .file_name(name.clone())
            .mime_str(mime.as_ref())
            .map_err(|err| TransportError::Protocol(err.to_string()))?;

        let request = self
            .client
            .post(self.url(COPY_PATH))
            .multipart(Form::new().part("file", part));

        self.send(request).await?;
        debug!(file = %name, size = meta.len(), mime = %mime, "Uploaded file");
        Ok(())
    }

    async fn fetch_latest(&self) -> Result<Option<RemoteClipboardEntry>, TransportError> {
        let request = self
            .client
            .get(self.url(LATEST_PATH))
            .timeout(self.timeout)
            .header(ACCEPT, "application/json");

        let response = match self.send(request).await {
            Err(TransportError::Server { status: 404 }) => return Ok(None),
            other => other?,
        };
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        // Some deployments answer the first request with the payload itself.
        if !is_json(response.headers()) {
            let content = self.read_binary(response).await?;
            return Ok(Some(RemoteClipboardEntry::new(content, None)));
        }

        let body = response.bytes().await.map_err(network_error)?;
        if body.is_empty() {
            return Ok(None);
        }
        let meta: LatestMetadata = serde_json::from_slice(&body)
            .map_err(|err| TransportError::Protocol(format!("invalid metadata: {err}")))?;
        let timestamp = meta.timestamp();

        if meta.kind.is_none() {
            return Ok(None);
        }
        if meta.is_text() {
            let text = meta.text().unwrap_or_default();
            return Ok(Some(RemoteClipboardEntry::new(
                RemoteContent::Text(text),
                timestamp,
            )));
        }

        let request = self
            .client
            .get(self.url(LATEST_PATH))
            .header(ACCEPT, "*/*");
        let response = self.send(request).await?;
        let content = self.read_binary(response).await?;
        Ok(Some(RemoteClipboardEntry::new(content, timestamp)))
    }
}

fn network_error(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

fn file_error(path: &Path, err: std::io::Error) -> TransportError {
    if err.kind() == ErrorKind::NotFound {
        TransportError::FileNotFound(path.to_path_buf())
    } else {
        TransportError::Io(format!("{}: {err}", path.display()))
    }
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_json(headers: &HeaderMap) -> bool {
    header_str(headers, CONTENT_TYPE).is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.starts_with("application/json") || ct.contains("+json")
    })
}

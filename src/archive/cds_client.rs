//! HTTP client for the Copernicus Climate Data Store retrieve transaction.

use crate::archive::error::ArchiveError;
use crate::archive::ArchiveClient;
use crate::request::Era5Request;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, info};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio_util::io::StreamReader;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
// Queue times of several hours are normal for ERA5 requests.
const DEFAULT_MAX_POLLS: u32 = 4 * 60 * 60;

/// Client for the CDS v2 API.
///
/// One [`ArchiveClient::retrieve`] call runs the full transaction: submit
/// the request, poll the task until it leaves the queue, then stream the
/// result to disk. The download goes to `{target}.part` first and is renamed
/// onto `target` only once complete, so an interrupted transfer never leaves
/// a plausible final artifact behind.
///
/// The configured credential string (`uid:key`) is applied verbatim as HTTP
/// Basic credentials; there is no credential discovery or refresh.
pub struct CdsClient {
    http: Client,
    base_url: String,
    uid: String,
    key: String,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
struct TaskReply {
    state: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    error: Option<TaskError>,
}

#[derive(Debug, Deserialize)]
struct TaskError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl TaskReply {
    fn error_message(&self) -> String {
        match &self.error {
            Some(TaskError { message, reason }) => {
                let message = message.as_deref().unwrap_or("unknown error");
                match reason.as_deref() {
                    Some(reason) => format!("{message} ({reason})"),
                    None => message.to_string(),
                }
            }
            None => "unknown error".to_string(),
        }
    }
}

impl CdsClient {
    /// Builds a client for the given API root and `uid:key` credential
    /// string. A credential without a `:` is used as the username alone.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let (uid, key) = match api_key.split_once(':') {
            Some((uid, key)) => (uid.to_string(), key.to_string()),
            None => (api_key.to_string(), String::new()),
        };
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            uid,
            key,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Overrides the poll pacing. Mainly for tests against a fake archive.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn submit(&self, dataset: &str, request: &Era5Request) -> Result<TaskReply, ArchiveError> {
        let url = format!("{}/resources/{}", self.base_url, dataset);
        debug!("submitting request to {url}");
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.uid, Some(&self.key))
            .json(request)
            .send()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.clone(), e))?;
        let response = check_status(response, &url)?;
        response
            .json()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url, e))
    }

    /// Polls the task until it completes, returning the download location.
    async fn wait_for_completion(&self, mut reply: TaskReply) -> Result<String, ArchiveError> {
        let mut polls = 0u32;
        loop {
            match reply.state.as_str() {
                "completed" => {
                    return reply.location.ok_or(ArchiveError::MalformedReply("location"))
                }
                "failed" => return Err(ArchiveError::TaskFailed(reply.error_message())),
                "queued" | "running" => {}
                other => {
                    return Err(ArchiveError::TaskFailed(format!(
                        "task entered unexpected state '{other}'"
                    )))
                }
            }

            if polls >= self.max_polls {
                return Err(ArchiveError::Timeout(polls));
            }
            polls += 1;

            let request_id = reply
                .request_id
                .take()
                .ok_or(ArchiveError::MalformedReply("request_id"))?;
            tokio::time::sleep(self.poll_interval).await;

            let url = format!("{}/tasks/{}", self.base_url, request_id);
            debug!("polling task {request_id} ({}: {})", polls, reply.state);
            let response = self
                .http
                .get(&url)
                .basic_auth(&self.uid, Some(&self.key))
                .send()
                .await
                .map_err(|e| ArchiveError::NetworkRequest(url.clone(), e))?;
            let response = check_status(response, &url)?;
            let mut next: TaskReply = response
                .json()
                .await
                .map_err(|e| ArchiveError::NetworkRequest(url, e))?;
            // Poll replies may omit the request id; keep the one we have.
            if next.request_id.is_none() {
                next.request_id = Some(request_id);
            }
            reply = next;
        }
    }

    /// Streams the completed result to `{target}.part`, then renames it
    /// onto `target`.
    async fn download(&self, location: &str, target: &Path) -> Result<(), ArchiveError> {
        let url = self.resolve_location(location)?;
        info!("downloading result from {url}");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.to_string(), e))?;
        let response = check_status(response, url.as_str())?;

        let part_path = part_path(target);
        let stream = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut file = fs::File::create(&part_path)
            .await
            .map_err(|e| ArchiveError::Io(part_path.clone(), e))?;
        tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| ArchiveError::Io(part_path.clone(), e))?;
        drop(file);

        fs::rename(&part_path, target)
            .await
            .map_err(|e| ArchiveError::Io(target.to_path_buf(), e))
    }

    fn resolve_location(&self, location: &str) -> Result<Url, ArchiveError> {
        let resolved = if location.starts_with("http://") || location.starts_with("https://") {
            Url::parse(location)
        } else {
            Url::parse(&self.base_url).and_then(|base| base.join(location))
        };
        resolved.map_err(|_| ArchiveError::MalformedReply("location"))
    }
}

#[async_trait]
impl ArchiveClient for CdsClient {
    async fn retrieve(
        &self,
        dataset: &str,
        request: &Era5Request,
        target: &Path,
    ) -> Result<(), ArchiveError> {
        let reply = self.submit(dataset, request).await?;
        let location = self.wait_for_completion(reply).await?;
        self.download(&location, target).await
    }
}

fn part_path(target: &Path) -> PathBuf {
    let mut path = target.as_os_str().to_owned();
    path.push(".part");
    PathBuf::from(path)
}

fn check_status(response: Response, url: &str) -> Result<Response, ArchiveError> {
    match response.error_for_status() {
        Ok(response) => Ok(response),
        Err(e) => {
            if let Some(status) = e.status() {
                Err(ArchiveError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                })
            } else {
                Err(ArchiveError::NetworkRequest(url.to_string(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;
    use crate::types::level::RetrievalLevel;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> Era5Request {
        Era5Request::new(
            RetrievalLevel::Pressure,
            2020,
            6,
            BoundingBox::around(53.3267, -9.9046, 11.0),
        )
    }

    fn client(server: &MockServer) -> CdsClient {
        CdsClient::new(&server.uri(), "1234:secret")
            .with_polling(Duration::from_millis(10), 20)
    }

    #[tokio::test]
    async fn completed_transaction_writes_target() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources/reanalysis-era5-pressure-levels"))
            .and(body_string_contains("reanalysis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "completed",
                "request_id": "r-1",
                "location": "/download/r-1.nc"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/download/r-1.nc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"netcdf-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("MHD_3dwind_2020_06.nc");
        client(&server)
            .retrieve("reanalysis-era5-pressure-levels", &request(), &target)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"netcdf-bytes");
        assert!(!part_path(&target).exists());
    }

    #[tokio::test]
    async fn queued_task_is_polled_to_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources/reanalysis-era5-pressure-levels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "queued",
                "request_id": "r-2"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks/r-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "completed",
                "location": "/download/r-2.nc"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/download/r-2.nc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.nc");
        client(&server)
            .retrieve("reanalysis-era5-pressure-levels", &request(), &target)
            .await
            .unwrap();
        assert!(target.exists());
    }

    #[tokio::test]
    async fn failed_task_carries_archive_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources/reanalysis-era5-pressure-levels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "failed",
                "request_id": "r-3",
                "error": { "message": "no data", "reason": "variable unavailable" }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.nc");
        let err = client(&server)
            .retrieve("reanalysis-era5-pressure-levels", &request(), &target)
            .await
            .unwrap_err();

        match err {
            ArchiveError::TaskFailed(message) => {
                assert!(message.contains("no data"));
                assert!(message.contains("variable unavailable"));
            }
            other => panic!("expected TaskFailed, got {other:?}"),
        }
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn rejected_submit_maps_to_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources/reanalysis-era5-pressure-levels"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = client(&server)
            .retrieve(
                "reanalysis-era5-pressure-levels",
                &request(),
                &dir.path().join("out.nc"),
            )
            .await
            .unwrap_err();

        match err {
            ArchiveError::HttpStatus { status, .. } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN)
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stuck_task_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resources/reanalysis-era5-pressure-levels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "queued",
                "request_id": "r-4"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks/r-4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "queued",
                "request_id": "r-4"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = CdsClient::new(&server.uri(), "1234:secret")
            .with_polling(Duration::from_millis(1), 3)
            .retrieve(
                "reanalysis-era5-pressure-levels",
                &request(),
                &dir.path().join("out.nc"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ArchiveError::Timeout(3)));
    }
}

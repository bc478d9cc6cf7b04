use crate::config::ClientConfig;
use crate::retrieval::error::RetrieveError;
use crate::retrieval::protocol::{ApiProblem, Asset, JobResults, JobState, JobStatus};
use crate::types::request::RetrieveRequest;
use crate::utils::ensure_parent_dir_exists;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use url::Url;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// A file written by a completed retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub path: PathBuf,
    pub job_id: String,
    pub bytes: u64,
}

/// Drives one request through the remote job life cycle:
/// submit, poll until finished, look up the result and download it.
///
/// Failures are returned as they happen; nothing is retried.
pub struct JobRunner {
    config: ClientConfig,
    http: Client,
}

impl JobRunner {
    pub fn new(config: ClientConfig) -> JobRunner {
        let http = Client::builder()
            .user_agent(concat!("cdsfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        JobRunner { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validates and submits a request, returning the freshly created job.
    pub async fn submit(&self, request: &RetrieveRequest) -> Result<JobStatus, RetrieveError> {
        request.validate()?;
        let url = self.config.endpoint(&format!(
            "retrieve/v1/processes/{}/execution",
            request.dataset
        ));
        info!("Submitting request for {} to {}", request.dataset, url);
        debug!("Request parameters: {}", request.to_inputs());

        let builder = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.config.key)
            .json(&request.to_inputs());
        let status: JobStatus = self.send_json(builder, url).await?;
        info!("Job {} {}", status.job_id, status.status);
        Ok(status)
    }

    pub async fn status(&self, job_id: &str) -> Result<JobStatus, RetrieveError> {
        let url = self.config.endpoint(&format!("retrieve/v1/jobs/{}", job_id));
        let builder = self.http.get(&url).header(TOKEN_HEADER, &self.config.key);
        self.send_json(builder, url).await
    }

    /// Polls the job until it reaches a terminal state.
    ///
    /// Returns the final status when the job succeeded and
    /// [`RetrieveError::JobFailed`] otherwise.
    pub async fn wait(&self, job: JobStatus) -> Result<JobStatus, RetrieveError> {
        let mut current = job;
        let mut delay = self.config.poll.first();
        while !current.status.is_terminal() {
            debug!(
                "Job {} is {}, checking again in {:?}",
                current.job_id, current.status, delay
            );
            tokio::time::sleep(delay).await;
            delay = self.config.poll.next(delay);

            let previous = current.status;
            current = self.status(&current.job_id).await?;
            if current.status != previous {
                info!("Job {} {}", current.job_id, current.status);
            }
        }

        if current.status == JobState::Successful {
            return Ok(current);
        }
        let message = match self.results(&current.job_id).await {
            Err(RetrieveError::Api { message, .. }) => message,
            Err(e) => e.to_string(),
            Ok(_) => "no details provided".to_string(),
        };
        warn!("Job {} {}: {}", current.job_id, current.status, message);
        Err(RetrieveError::JobFailed {
            job_id: current.job_id,
            state: current.status,
            message,
        })
    }

    /// Looks up the result asset of a successful job.
    pub async fn results(&self, job_id: &str) -> Result<Asset, RetrieveError> {
        let url = self
            .config
            .endpoint(&format!("retrieve/v1/jobs/{}/results", job_id));
        let builder = self.http.get(&url).header(TOKEN_HEADER, &self.config.key);
        let results: JobResults = self.send_json(builder, url).await?;
        results
            .asset
            .map(|envelope| envelope.value)
            .ok_or_else(|| RetrieveError::MissingAsset(job_id.to_string()))
    }

    /// Streams the asset to `target`, replacing any existing file only once the
    /// download has completed. Returns the number of bytes written.
    pub async fn download(&self, asset: &Asset, target: &Path) -> Result<u64, RetrieveError> {
        let url = if asset.href.starts_with("http://") || asset.href.starts_with("https://") {
            asset.href.clone()
        } else {
            self.config.endpoint(&asset.href)
        };
        info!("Downloading {} to {}", url, target.display());

        ensure_parent_dir_exists(target)
            .await
            .map_err(|e| RetrieveError::FileWrite(target.to_path_buf(), e))?;
        let mut builder = self.http.get(&url);
        if self.is_api_url(&url) {
            builder = builder.header(TOKEN_HEADER, &self.config.key);
        }
        let response = self.send(builder, url).await?;

        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp_file = NamedTempFile::new_in(dir)
            .map_err(|e| RetrieveError::TempFile(target.to_path_buf(), e))?;
        let handle = temp_file
            .reopen()
            .map_err(|e| RetrieveError::TempFile(target.to_path_buf(), e))?;
        let mut file = tokio::fs::File::from_std(handle);

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| RetrieveError::FileWrite(target.to_path_buf(), e))?;
        file.flush()
            .await
            .map_err(|e| RetrieveError::FileWrite(target.to_path_buf(), e))?;
        drop(file);

        if let Some(expected) = asset.size {
            if expected != written {
                return Err(RetrieveError::SizeMismatch {
                    path: target.to_path_buf(),
                    expected,
                    found: written,
                });
            }
        }

        temp_file
            .persist(target)
            .map_err(|e| RetrieveError::FileWrite(target.to_path_buf(), e.error))?;
        info!("Wrote {} bytes to {}", written, target.display());
        Ok(written)
    }

    /// Runs the whole life cycle for one request and writes the result to `target`.
    pub async fn retrieve(
        &self,
        request: &RetrieveRequest,
        target: &Path,
    ) -> Result<RetrievedFile, RetrieveError> {
        let job = self.submit(request).await?;
        let job = self.wait(job).await?;
        let asset = self.results(&job.job_id).await?;
        let bytes = self.download(&asset, target).await?;
        Ok(RetrievedFile {
            path: target.to_path_buf(),
            job_id: job.job_id,
            bytes,
        })
    }

    /// Whether `url` is served by the configured API host; only those get the token.
    fn is_api_url(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|u| u.origin() == self.config.url.origin())
            .unwrap_or(false)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: String,
    ) -> Result<T, RetrieveError> {
        let response = self.send(builder, url.clone()).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RetrieveError::Decode(url, e))
    }

    async fn send(&self, builder: RequestBuilder, url: String) -> Result<Response, RetrieveError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RetrieveError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiProblem>(&body) {
            Ok(problem) => problem.message(),
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        warn!("HTTP error for {}: {} {}", url, status, message);
        Err(RetrieveError::Api {
            url,
            status,
            message,
        })
    }
}

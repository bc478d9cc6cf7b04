//! This module provides the main entry point for talking to the Climate Data Store.
//! It wraps configuration and the retrieve job life cycle behind one client.

use crate::clients::temperature_client::TemperatureClient;
use crate::config::ClientConfig;
use crate::error::CdsError;
use crate::retrieval::job_runner::{JobRunner, RetrievedFile};
use crate::retrieval::protocol::{Asset, JobStatus};
use crate::types::request::RetrieveRequest;
use bon::bon;
use std::path::{Path, PathBuf};

/// The main client struct for retrieving data from the Climate Data Store.
///
/// Create an instance with [`Cds::new()`], which reads credentials from the
/// environment or `~/.cdsapirc`, or with [`Cds::with_config()`].
///
/// # Examples
///
/// ```no_run
/// # use cdsfetch::{Cds, CdsError, RetrieveRequest, Year};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), CdsError> {
/// let client = Cds::new().await?;
/// let request = RetrieveRequest::monthly_mean_temperature(Year(2018));
/// let file = client
///     .retrieve()
///     .request(&request)
///     .target(Path::new("temperature-data.nc"))
///     .call()
///     .await?;
/// println!("Wrote {} bytes to {}", file.bytes, file.path.display());
/// # Ok(())
/// # }
/// ```
pub struct Cds {
    runner: JobRunner,
}

#[bon]
impl Cds {
    /// Creates a client from `CDSAPI_URL` / `CDSAPI_KEY` or the credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError::Config`] if no API key is configured or the credentials
    /// file cannot be read.
    pub async fn new() -> Result<Self, CdsError> {
        let config = ClientConfig::load().await?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            runner: JobRunner::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.runner.config()
    }

    /// Retrieves one request and writes the result to disk.
    ///
    /// This method uses a builder pattern.
    ///
    /// * `.request(&RetrieveRequest)`: **Required.** What to retrieve.
    /// * `.target(&Path)`: Optional. Output file. Defaults to `<dataset>.<format extension>`
    ///   in the working directory.
    ///
    /// The call submits the request, waits for the remote job to finish and downloads
    /// the result. Errors from any step are returned unchanged; nothing is retried.
    #[builder]
    pub async fn retrieve(
        &self,
        request: &RetrieveRequest,
        target: Option<&Path>,
    ) -> Result<RetrievedFile, CdsError> {
        let target = match target {
            Some(path) => path.to_path_buf(),
            None => default_target(request),
        };
        Ok(self.runner.retrieve(request, &target).await?)
    }

    /// Submits a request without waiting for it.
    pub async fn submit(&self, request: &RetrieveRequest) -> Result<JobStatus, CdsError> {
        Ok(self.runner.submit(request).await?)
    }

    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, CdsError> {
        Ok(self.runner.status(job_id).await?)
    }

    /// Waits for a submitted job and returns its result asset.
    pub async fn wait(&self, job: JobStatus) -> Result<Asset, CdsError> {
        let job = self.runner.wait(job).await?;
        Ok(self.runner.results(&job.job_id).await?)
    }

    pub async fn download(&self, asset: &Asset, target: &Path) -> Result<u64, CdsError> {
        Ok(self.runner.download(asset, target).await?)
    }

    /// Monthly mean 2 m temperature for a whole year, written to a NetCDF file.
    pub fn temperature(&self) -> TemperatureClient<'_> {
        TemperatureClient::new(self)
    }

    /// Near-surface temperature maps for single months.
    #[cfg(feature = "netcdf")]
    pub fn map(&self) -> crate::clients::map_client::MapClient<'_> {
        crate::clients::map_client::MapClient::new(self)
    }
}

fn default_target(request: &RetrieveRequest) -> PathBuf {
    PathBuf::from(format!(
        "{}.{}",
        request.dataset,
        request.format.file_extension()
    ))
}

//! JSON documents exchanged with the retrieve API.

use serde::Deserialize;
use std::fmt;

/// Life cycle state of a remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Accepted,
    Running,
    Successful,
    Failed,
    Rejected,
    Dismissed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Accepted | JobState::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Accepted => "accepted",
            JobState::Running => "running",
            JobState::Successful => "successful",
            JobState::Failed => "failed",
            JobState::Rejected => "rejected",
            JobState::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "jobID")]
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct JobResults {
    pub asset: Option<AssetEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct AssetEnvelope {
    pub value: Asset,
}

/// The downloadable result of a successful job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(rename = "file:size", default)]
    pub size: Option<u64>,
}

/// Problem document the API returns with error statuses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub traceback: Option<String>,
}

impl ApiProblem {
    pub fn message(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{}: {}", title, detail),
            (Some(title), None) => title.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "no details provided".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_job_status() {
        let status: JobStatus = serde_json::from_value(json!({
            "processID": "reanalysis-era5-single-levels-monthly-means",
            "type": "process",
            "jobID": "8f4b",
            "status": "running",
            "created": "2024-09-26T09:59:12.123Z"
        }))
        .unwrap();
        assert_eq!(status.job_id, "8f4b");
        assert_eq!(status.status, JobState::Running);
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn test_deserialize_results() {
        let results: JobResults = serde_json::from_value(json!({
            "asset": {
                "value": {
                    "type": "application/netcdf",
                    "href": "https://download.example/abc.nc",
                    "file:checksum": "d41d8cd9",
                    "file:size": 1024,
                    "file:local_path": "s3://bucket/abc.nc"
                }
            }
        }))
        .unwrap();
        let asset = results.asset.unwrap().value;
        assert_eq!(asset.href, "https://download.example/abc.nc");
        assert_eq!(asset.size, Some(1024));
        assert_eq!(asset.media_type.as_deref(), Some("application/netcdf"));
    }

    #[test]
    fn test_problem_message() {
        let problem: ApiProblem = serde_json::from_value(json!({
            "type": "about:blank",
            "title": "required licences not accepted",
            "detail": "please accept the licence on the dataset page"
        }))
        .unwrap();
        assert_eq!(
            problem.message(),
            "required licences not accepted: please accept the licence on the dataset page"
        );
        assert_eq!(ApiProblem::default().message(), "no details provided");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Successful.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Dismissed.is_terminal());
        assert!(!JobState::Accepted.is_terminal());
    }
}

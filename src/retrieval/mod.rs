pub mod error;
pub mod job_runner;
pub mod protocol;

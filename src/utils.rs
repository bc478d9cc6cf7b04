use crate::config::ConfigError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const RC_FILE_NAME: &str = ".cdsapirc";

/// Location of the user's API credentials file, `~/.cdsapirc`.
pub fn get_rc_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .ok_or(ConfigError::HomeDirResolution)
        .map(|p| p.join(RC_FILE_NAME))
}

/// Creates the directory a file is about to be written into, if needed.
pub async fn ensure_parent_dir_exists(path: &Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    match tokio::fs::metadata(parent).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Path exists but is not a directory: {}", parent.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", parent.display());
            tokio::fs::create_dir_all(parent).await
        }
        Err(e) => Err(e),
    }
}

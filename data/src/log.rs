use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::data_path;

const LOG_FILE: &str = "candleview-current.log";
const PREVIOUS_LOG_FILE: &str = "candleview-previous.log";

/// Current log file location, creating its directory when missing.
pub fn path() -> Result<PathBuf, Error> {
    let full_path = data_path(Some(LOG_FILE));

    let parent = full_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    Ok(full_path)
}

/// Moves the last run's log aside so each run starts a fresh file.
pub fn rotate(current: &Path) -> io::Result<()> {
    let previous = current
        .parent()
        .map_or_else(|| PathBuf::from(PREVIOUS_LOG_FILE), |dir| dir.join(PREVIOUS_LOG_FILE));

    if previous.exists() {
        fs::remove_file(&previous)?;
    }

    if current.exists() {
        fs::rename(current, &previous)?;
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}

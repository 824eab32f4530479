//! Dork list loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tordork_core::parse_queries;

/// Fatal problems with the dork list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No valid dorks found in {}", .0.display())]
    Empty(PathBuf),
}

/// Read the dork file and return its non-blank, trimmed lines
pub fn load_queries(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let queries = parse_queries(&text);
    if queries.is_empty() {
        return Err(InputError::Empty(path.to_path_buf()));
    }

    Ok(queries)
}

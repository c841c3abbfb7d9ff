use std::path::{Path, PathBuf};

use crate::errors::StateError;

use super::{parse_terraform_state, TerraformState};

pub const DEFAULT_STATE_FILE_NAME: &str = "terraform.tfstate";
pub const DEFAULT_DATA_DIR: &str = ".terraform";

pub fn parse_terraform_state_file(path: &Path) -> Result<TerraformState, StateError> {
    let bytes = std::fs::read(path)
        .map_err(|source| StateError::Io { path: path.to_path_buf(), source })?;

    parse_terraform_state(&bytes).map_err(|e| StateError::InvalidStateFile {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Locate the state file of a working directory.
///
/// `init` keeps a copy of remote state at `<data_dir>/terraform.tfstate`, which
/// takes precedence over a local `<working_dir>/terraform.tfstate`. The data
/// directory defaults to `<working_dir>/.terraform`; relative data directories
/// are resolved against `working_dir`.
pub fn find_terraform_state_file(working_dir: &Path, data_dir: Option<&Path>) -> Option<PathBuf> {
    let data_dir = match data_dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => working_dir.join(dir),
        None => working_dir.join(DEFAULT_DATA_DIR),
    };

    [data_dir.join(DEFAULT_STATE_FILE_NAME), working_dir.join(DEFAULT_STATE_FILE_NAME)]
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Returns `Ok(None)` when the working directory holds no state at all.
pub fn parse_terraform_state_file_from_location(
    working_dir: &Path,
    data_dir: Option<&Path>,
) -> Result<Option<(PathBuf, TerraformState)>, StateError> {
    let Some(path) = find_terraform_state_file(working_dir, data_dir) else {
        return Ok(None);
    };
    let state = parse_terraform_state_file(&path)?;
    Ok(Some((path, state)))
}

//! Resolving a [`Program`] to an executable file.
//!
//! The directories of the search-path are checked in order, the first one
//! containing an executable file named after the program wins. Unless told
//! otherwise, the search-path is taken from the `PATH` environment variable.

use std::env;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::graphics::Program;

use super::launch::LaunchError;

pub(crate) fn find_executable(
    program: Program,
    search_path: Option<&[PathBuf]>,
) -> Result<PathBuf, LaunchError> {
    let file_name = format!("{program}{}", env::consts::EXE_SUFFIX);
    let from_env;
    let search_path: &[PathBuf] = match search_path {
        Some(search_path) => search_path,
        None => {
            from_env = env_search_path();
            &from_env
        },
    };

    search_path
        .iter()
        .inspect(|p| trace!("search-path candidate: {:?}", p))
        .filter(|dir| dir.is_dir())
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
        .inspect(|f| trace!("resolved {} as {:?}", program, f))
        .ok_or_else(|| LaunchError::ExecutableNotFound(program.to_string()))
}

fn env_search_path() -> Vec<PathBuf> {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).collect())
        .unwrap_or_default()
}

#[cfg(unix)]
pub(crate) fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub(crate) fn is_executable(path: &Path) -> bool {
    path.is_file()
}

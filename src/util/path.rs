//! Home-directory expansion for configured paths

use std::path::PathBuf;

use thiserror::Error;

/// Errors from expanding `~` shorthand
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("cannot expand {0}: home directory not available")]
    HomeUnavailable(String),
    #[error("cannot expand {0}: only the current user's home (~) is supported")]
    UnsupportedUser(String),
}

/// Expand a leading `~` or `~/` to the user's home directory
///
/// Paths without a leading tilde are returned unchanged. `~name/...` forms
/// are rejected rather than guessed at.
pub fn expand_home(path: &str) -> Result<PathBuf, ExpandError> {
    expand_home_with(path, dirs::home_dir())
}

/// Expansion against an explicit home directory
pub fn expand_home_with(path: &str, home: Option<PathBuf>) -> Result<PathBuf, ExpandError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    if !rest.is_empty() && !rest.starts_with('/') && !rest.starts_with(std::path::MAIN_SEPARATOR)
    {
        return Err(ExpandError::UnsupportedUser(path.to_string()));
    }

    let home = home.ok_or_else(|| ExpandError::HomeUnavailable(path.to_string()))?;
    let rest = rest.trim_start_matches(['/', std::path::MAIN_SEPARATOR]);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

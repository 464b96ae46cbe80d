use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::JcfError;

static OVERRIDE_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^=\s][^=]*?)\s*=(.*)$").expect("override pattern is valid")
});

/// Split `Path.To.Key=value` into its path and (trimmed) value.
pub(super) fn parse_override(spec: &str) -> Result<(String, String), JcfError> {
    let caps = OVERRIDE_SPEC.captures(spec).ok_or_else(|| JcfError::InvalidPath {
        path: spec.to_string(),
        message: "Override must look like `Path.To.Key=value`".into(),
        hint: Some("Example: Listener.State.Port=8080".into()),
        code: Some(407),
    })?;
    Ok((caps[1].to_string(), caps[2].trim().to_string()))
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_home(path: &Path) -> Result<PathBuf, JcfError> {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir().ok_or_else(|| JcfError::FileError {
        message: "Could not determine home directory for ~ expansion".into(),
        path: path.to_string_lossy().to_string(),
        hint: Some("Set HOME or use an absolute path".into()),
        code: Some(300),
    })?;
    Ok(home.join(rest))
}

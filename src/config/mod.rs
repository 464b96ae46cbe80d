// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use crate::node::Node;
use crate::parser;
use crate::resolver::NodeRef;
use crate::JcfError;

mod access;
mod conversion;
mod helpers;
mod validation;

pub use access::Outcome;
pub use conversion::FromScalar;

/// A loaded configuration, owned by whoever starts the application and
/// handed by reference to the parts that read it.
#[derive(Debug, Clone, Default)]
pub struct JcfConfig {
    root: Node,
    source: Option<PathBuf>,
}

impl JcfConfig {
    /// Wrap an already built tree (defaults assembled in code, tests).
    pub fn new(root: Node) -> Self {
        Self { root, source: None }
    }

    /// Parse a JCF config from a string (no file I/O).
    pub fn from_str(content: &str) -> Result<Self, JcfError> {
        Ok(Self::new(parser::parse(content)?))
    }

    /// Load a JCF config file. `save()` later writes back to the same path.
    ///
    /// # Example
    /// ```ignore
    /// let config = JcfConfig::from_file("jws.jcf")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JcfError> {
        let path = helpers::expand_home(path.as_ref())?;
        let content = fs::read_to_string(&path).map_err(|e| JcfError::FileError {
            message: format!("Failed to read file: {}", e),
            path: path.to_string_lossy().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(301),
        })?;

        let root = parser::parse(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(Self { root, source: Some(path) })
    }

    /// Load a JCF config file with fallback support
    ///
    /// Tries to load from the primary path first. If that fails (file not found),
    /// attempts to load from the fallback path. A primary file that exists but
    /// is malformed is an error, not a reason to fall back.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, JcfError> {
        match Self::from_file(&primary) {
            Ok(config) => Ok(config),
            Err(JcfError::FileError { .. }) => {
                log::warn!(
                    "could not read {}, trying fallback {}",
                    primary.as_ref().display(),
                    fallback.as_ref().display()
                );
                Self::from_file(&fallback).map_err(|e| match e {
                    JcfError::FileError { message, .. } => JcfError::FileError {
                        message: format!(
                            "Failed to load config from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the config files exists".into()),
                        code: Some(302),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Try each location in order and load the first one that can be read.
    pub fn from_locations<P: AsRef<Path>>(locations: &[P]) -> Result<Self, JcfError> {
        for location in locations {
            log::debug!("trying config location {}", location.as_ref().display());
            match Self::from_file(location) {
                Ok(config) => return Ok(config),
                Err(JcfError::FileError { message, .. }) => {
                    log::debug!("skipping {}: {}", location.as_ref().display(), message);
                }
                Err(other) => return Err(other),
            }
        }

        let tried: Vec<String> = locations
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect();
        Err(JcfError::FileError {
            message: "Failed to find any configuration file".into(),
            path: tried.join(", "),
            hint: Some("Create one of the listed files".into()),
            code: Some(304),
        })
    }

    /// Per-user location first, then the system-wide one:
    /// `<config dir>/<app>/<app>.jcf` and `/usr/local/etc/<app>/<app>.jcf`.
    pub fn default_locations(app: &str) -> Vec<PathBuf> {
        let file = format!("{}.jcf", app);
        let mut locations = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join(app).join(&file));
        }
        locations.push(Path::new("/usr/local/etc").join(app).join(&file));
        locations
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn scope(&self) -> NodeRef<'_> {
        self.root.root()
    }

    /// Where this config was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Apply one startup override, creating intermediate blocks as needed.
    pub fn apply_override(&mut self, path: &str, value: &str) -> Result<(), JcfError> {
        self.root.override_value(path, value)?;
        log::info!("override {} = {}", path.trim(), value);
        Ok(())
    }

    /// Apply overrides written as `Path.To.Key=value`, in order.
    pub fn apply_overrides<I, S>(&mut self, specs: I) -> Result<(), JcfError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for spec in specs {
            let (path, value) = helpers::parse_override(spec.as_ref())?;
            self.apply_override(&path, &value)?;
        }
        Ok(())
    }

    /// Write back to the file this config was loaded from.
    pub fn save(&self) -> Result<(), JcfError> {
        match &self.source {
            Some(path) => self.root.save(path),
            None => Err(JcfError::FileError {
                message: "Configuration was not loaded from a file".into(),
                path: String::new(),
                hint: Some("Use save_to(path) instead".into()),
                code: Some(305),
            }),
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), JcfError> {
        self.root.save(path)
    }
}

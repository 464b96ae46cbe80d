use std::fmt;

use super::*;

/// Result of a soft lookup: either the value, or why there is none.
///
/// Missing keys and wrong categories are ordinary outcomes here, not
/// errors. Only interpolation failures still come back as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    TypeMismatch,
    UnknownKey,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::TypeMismatch => Outcome::TypeMismatch,
            Outcome::UnknownKey => Outcome::UnknownKey,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.success().unwrap_or(default)
    }

    /// The value, or `default` after logging a warning that names `path`.
    pub fn or_warn(self, path: &str, default: T) -> T
    where
        T: fmt::Debug,
    {
        match self {
            Outcome::Success(v) => v,
            Outcome::TypeMismatch => {
                log::warn!("{} has the wrong type; using fallback {:?}", path, default);
                default
            }
            Outcome::UnknownKey => {
                log::warn!("{} is not set; using fallback {:?}", path, default);
                default
            }
        }
    }

    /// Absorb soft resolution errors; pass interpolation failures through.
    pub(crate) fn from_lookup(result: Result<T, JcfError>) -> Result<Outcome<T>, JcfError> {
        match result {
            Ok(v) => Ok(Outcome::Success(v)),
            Err(JcfError::WrongType { .. }) => Ok(Outcome::TypeMismatch),
            Err(JcfError::UnknownKey { .. }) | Err(JcfError::InvalidPath { .. }) => Ok(Outcome::UnknownKey),
            Err(e) => Err(e),
        }
    }
}

impl<'a> NodeRef<'a> {
    /// Interpolated scalar at `path`.
    ///
    /// # Examples
    /// ```no_run
    /// # use jcf::JcfConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = JcfConfig::from_file("jws.jcf")?;
    /// let state = config.scope().get_string("JWS.Listener.State")?.or_warn("JWS.Listener.State", "Debug".into());
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_string(&self, path: &str) -> Result<Outcome<String>, JcfError> {
        Outcome::from_lookup(self.get_scalar(path))
    }

    pub fn get_block(&self, path: &str) -> Result<Outcome<NodeRef<'a>>, JcfError> {
        Outcome::from_lookup(self.get_child(path))
    }

    pub fn get_list_of(&self, path: &str) -> Result<Outcome<Vec<NodeRef<'a>>>, JcfError> {
        Outcome::from_lookup(self.get_list(path))
    }

    /// Interpolated scalar converted with [`FromScalar`]; text that does not
    /// convert is a `TypeMismatch`.
    pub fn get_parsed<T: FromScalar>(&self, path: &str) -> Result<Outcome<T>, JcfError> {
        Ok(match self.get_string(path)? {
            Outcome::Success(text) => match T::from_scalar(&text) {
                Some(v) => Outcome::Success(v),
                None => {
                    log::debug!("{} = '{}' does not convert to {}", path, text, T::TYPE_NAME);
                    Outcome::TypeMismatch
                }
            },
            Outcome::TypeMismatch => Outcome::TypeMismatch,
            Outcome::UnknownKey => Outcome::UnknownKey,
        })
    }

    /// `inner` read from every element of the list at `path`.
    pub fn get_mapped_list(&self, path: &str, inner: &str) -> Result<Outcome<Vec<Outcome<String>>>, JcfError> {
        match self.get_list_of(path)? {
            Outcome::Success(items) => {
                let mapped = items
                    .iter()
                    .map(|item| item.get_string(inner))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Outcome::Success(mapped))
            }
            Outcome::TypeMismatch => Ok(Outcome::TypeMismatch),
            Outcome::UnknownKey => Ok(Outcome::UnknownKey),
        }
    }
}

impl JcfConfig {
    /// Get an interpolated string using dot notation.
    ///
    /// # Examples
    /// ```no_run
    /// # use jcf::{JcfConfig, Outcome};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = JcfConfig::from_file("jws.jcf")?;
    /// if let Outcome::Success(root) = config.get_string("JWS.Server.Root")? {
    ///     println!("serving {}", root);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_string(&self, path: &str) -> Result<Outcome<String>, JcfError> {
        self.scope().get_string(path)
    }

    pub fn get_block(&self, path: &str) -> Result<Outcome<NodeRef<'_>>, JcfError> {
        self.scope().get_block(path)
    }

    pub fn get_list_of(&self, path: &str) -> Result<Outcome<Vec<NodeRef<'_>>>, JcfError> {
        self.scope().get_list_of(path)
    }

    pub fn get_parsed<T: FromScalar>(&self, path: &str) -> Result<Outcome<T>, JcfError> {
        self.scope().get_parsed(path)
    }

    pub fn get_mapped_list(&self, path: &str, inner: &str) -> Result<Outcome<Vec<Outcome<String>>>, JcfError> {
        self.scope().get_mapped_list(path, inner)
    }

    /// Get a value with a fallback default, logging why the default was used.
    ///
    /// # Examples
    /// ```no_run
    /// # use jcf::JcfConfig;
    /// # let config = JcfConfig::from_file("jws.jcf").unwrap();
    /// let port: u16 = config.get_or("JWS.Listener.Debug.Port", 8080).unwrap();
    /// let templates: bool = config.get_or("JWS.Templates.State", false).unwrap();
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> Result<T, JcfError>
    where
        T: FromScalar + fmt::Debug,
    {
        Ok(self.get_parsed(path)?.or_warn(path, default))
    }

    /// Like [`get_or`](Self::get_or) for plain strings.
    pub fn get_string_or(&self, path: &str, default: &str) -> Result<String, JcfError> {
        Ok(self.get_string(path)?.or_warn(path, default.to_string()))
    }

    /// Check if a configuration path exists (any category). The empty path
    /// names no key, so it is never present.
    pub fn has(&self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        self.root.get(path).is_ok() || self.root.get_child(path).is_ok()
    }

    /// Get all keys of the block at `path` (the empty path is the root).
    ///
    /// # Examples
    /// ```no_run
    /// # use jcf::JcfConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = JcfConfig::from_file("jws.jcf")?;
    /// for key in config.get_keys("JWS.Server.FileAssoc")? {
    ///     println!("JWS.Server.FileAssoc.{}", key);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, JcfError> {
        let block = self.root.get_child(path)?;
        Ok(block.node().keys().map(String::from).collect())
    }
}

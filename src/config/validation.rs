use regex::Regex;

use super::*;

impl JcfConfig {
    /// Get a value with validation - a value that fails `validator` is
    /// reported as a type mismatch and logged with the accepted values.
    pub fn get_validated<T, F>(&self, path: &str, validator: F, valid_values: &str) -> Result<Outcome<T>, JcfError>
    where
        T: FromScalar,
        F: FnOnce(&T) -> bool,
    {
        Ok(match self.get_parsed::<T>(path)? {
            Outcome::Success(v) => {
                if validator(&v) {
                    Outcome::Success(v)
                } else {
                    log::warn!("invalid value for {}; expected {}", path, valid_values);
                    Outcome::TypeMismatch
                }
            }
            other => other,
        })
    }

    /// Get a string and check it is one of `allowed_values` (case-insensitive).
    pub fn get_string_enum(&self, path: &str, allowed_values: &[&str]) -> Result<Outcome<String>, JcfError> {
        Ok(match self.get_string(path)? {
            Outcome::Success(value) => {
                let lower_value = value.to_lowercase();
                if allowed_values.iter().any(|v| v.to_lowercase() == lower_value) {
                    Outcome::Success(value)
                } else {
                    log::warn!(
                        "invalid value '{}' for {}; expected one of: {}",
                        value,
                        path,
                        allowed_values.join(", ")
                    );
                    Outcome::TypeMismatch
                }
            }
            other => other,
        })
    }

    /// Get a string that must match `pattern`.
    pub fn get_matching(&self, path: &str, pattern: &Regex) -> Result<Outcome<String>, JcfError> {
        Ok(match self.get_string(path)? {
            Outcome::Success(value) if pattern.is_match(&value) => Outcome::Success(value),
            Outcome::Success(value) => {
                log::warn!("value '{}' for {} does not match {}", value, path, pattern.as_str());
                Outcome::TypeMismatch
            }
            other => other,
        })
    }
}

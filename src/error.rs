use std::fmt;

use crate::node::EntryKind;

/// The main error type for JCF parsing, lookups and file handling.
#[derive(Debug, Clone, PartialEq)]
pub enum JcfError {
    /// The document text breaks the brace/bracket grammar. Fatal at load time.
    Malformed {
        message: String,
        line: usize,
        column: usize,
        key: String,
        value: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A path segment does not exist at the expected level.
    UnknownKey {
        path: String,
        segment: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// The entry exists but is not the requested category.
    WrongType {
        path: String,
        expected: EntryKind,
        found: EntryKind,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// The path itself cannot be understood (bad `#index`, empty segment).
    InvalidPath {
        path: String,
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A value the text format cannot hold (written, it would not read back).
    InvalidValue {
        path: String,
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A `$name$` reference could not be resolved up the ancestor chain.
    Lookup {
        name: String,
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    ExportError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl JcfError {
    pub fn code(&self) -> Option<u32> {
        match self {
            JcfError::Malformed { code, .. }
            | JcfError::UnknownKey { code, .. }
            | JcfError::WrongType { code, .. }
            | JcfError::InvalidPath { code, .. }
            | JcfError::InvalidValue { code, .. }
            | JcfError::Lookup { code, .. }
            | JcfError::FileError { code, .. }
            | JcfError::ExportError { code, .. } => *code,
        }
    }

    /// True for failures the accessor layer absorbs into an `Outcome`.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            JcfError::UnknownKey { .. } | JcfError::WrongType { .. } | JcfError::InvalidPath { .. }
        )
    }

    /// Prefix the path carried by a resolution error with an outer segment.
    pub(crate) fn within(self, outer: &str) -> JcfError {
        match self {
            JcfError::UnknownKey { path, segment, hint, code } => JcfError::UnknownKey {
                path: join_path(outer, &path),
                segment,
                hint,
                code,
            },
            JcfError::WrongType { path, expected, found, hint, code } => JcfError::WrongType {
                path: join_path(outer, &path),
                expected,
                found,
                hint,
                code,
            },
            JcfError::InvalidPath { path, message, hint, code } => JcfError::InvalidPath {
                path: join_path(outer, &path),
                message,
                hint,
                code,
            },
            JcfError::InvalidValue { path, message, hint, code } => JcfError::InvalidValue {
                path: join_path(outer, &path),
                message,
                hint,
                code,
            },
            other => other,
        }
    }
}

fn join_path(outer: &str, inner: &str) -> String {
    if inner.is_empty() {
        outer.to_string()
    } else {
        format!("{}.{}", outer, inner)
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for JcfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JcfError::Malformed { message, line, column, key, value, hint, code } =>
                write!(f, "[JCF] Malformed document at {}:{}: {} (key: '{}', value: '{}'){}",
                    line, column, message, key, value,
                    suffix(hint, code)
                ),
            JcfError::UnknownKey { path, segment, hint, code } =>
                write!(f, "[JCF] Unknown key '{}' in path '{}'{}",
                    segment, path,
                    suffix(hint, code)
                ),
            JcfError::WrongType { path, expected, found, hint, code } =>
                write!(f, "[JCF] Wrong type at '{}': expected {}, found {}{}",
                    path, expected, found,
                    suffix(hint, code)
                ),
            JcfError::InvalidPath { path, message, hint, code } =>
                write!(f, "[JCF] Invalid path '{}': {}{}",
                    path, message,
                    suffix(hint, code)
                ),
            JcfError::InvalidValue { path, message, hint, code } =>
                write!(f, "[JCF] Invalid value at '{}': {}{}",
                    path, message,
                    suffix(hint, code)
                ),
            JcfError::Lookup { name, message, hint, code } =>
                write!(f, "[JCF] Lookup Error for '${}$': {}{}",
                    name, message,
                    suffix(hint, code)
                ),
            JcfError::FileError { message, path, hint, code } =>
                write!(f, "[JCF] File Error '{}': {}{}",
                    path, message,
                    suffix(hint, code)
                ),
            JcfError::ExportError { message, hint, code } =>
                write!(f, "[JCF] Export Error: {}{}",
                    message,
                    suffix(hint, code)
                ),
        }
    }
}

impl std::error::Error for JcfError {}

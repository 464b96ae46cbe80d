// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

/// Conversion from an (already interpolated) scalar string.
///
/// Returning `None` makes the typed getters report a type mismatch.
pub trait FromScalar: Sized {
    const TYPE_NAME: &'static str;

    fn from_scalar(text: &str) -> Option<Self>;
}

impl FromScalar for String {
    const TYPE_NAME: &'static str = "string";

    fn from_scalar(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl FromScalar for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_scalar(text: &str) -> Option<Self> {
        if text.is_empty() {
            None
        } else {
            Some(PathBuf::from(text))
        }
    }
}

/// Switch-style settings are written `on`/`off` as often as `true`/`false`.
impl FromScalar for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_scalar(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Some(true),
            "off" | "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

macro_rules! from_scalar_via_parse {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_scalar(text: &str) -> Option<Self> {
                    text.trim().parse::<$ty>().ok()
                }
            }
        )*
    };
}

from_scalar_via_parse! {
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    f32 => "f32",
    f64 => "f64",
    char => "char",
}

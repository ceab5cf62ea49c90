//! Positional parameters.
//!
//! A command declares its positional parameters as a tuple of [`Value`]
//! types. Values are bound strictly in order; a `Vec<T>` in the last slot
//! absorbs whatever is left and an `Option<T>` may be missing.

use thiserror::Error;

use crate::schema::ConfigError;
use crate::value::{DecodeError, Value, ValueKind};

/// Positional arguments did not match the declared parameters.
#[derive(Debug, Error)]
pub enum PositionalError {
    #[error("missing positional argument [{0}]")]
    Missing(String),

    #[error("too many positional arguments: {0:?}")]
    TooMany(Vec<String>),

    #[error("decoding positional argument {index}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },
}

/// The positional parameters of a command.
pub trait Positionals: Sized {
    /// Kind of every parameter, in order.
    fn layout() -> Vec<ValueKind>;

    /// Placeholder of every parameter, in order.
    fn placeholders() -> Vec<String>;

    /// Binds the positional values, consuming all of them.
    fn bind(values: Vec<String>) -> Result<Self, PositionalError>;

    /// Rejects layouts where a list parameter is followed by another one.
    fn check() -> Result<(), ConfigError> {
        let layout = Self::layout();
        match layout.iter().position(|k| *k == ValueKind::List) {
            Some(i) if i + 1 != layout.len() => Err(ConfigError::ListPositionalNotLast),
            _ => Ok(()),
        }
    }

    /// The ` [placeholder]` suffix shown in the command synopsis.
    fn synopsis() -> String {
        let mut out = String::new();
        for (kind, placeholder) in Self::layout().into_iter().zip(Self::placeholders()) {
            out.push_str(&format!(" [{}]", placeholder));
            if kind == ValueKind::List {
                break;
            }
        }
        out
    }
}

impl Positionals for () {
    fn layout() -> Vec<ValueKind> {
        Vec::new()
    }

    fn placeholders() -> Vec<String> {
        Vec::new()
    }

    fn bind(values: Vec<String>) -> Result<Self, PositionalError> {
        if values.is_empty() {
            Ok(())
        } else {
            Err(PositionalError::TooMany(values))
        }
    }
}

/// Hands out positional values one parameter at a time.
struct Cursor {
    values: std::vec::IntoIter<String>,
    index: usize,
}

impl Cursor {
    fn next<T: Value>(&mut self) -> Result<T, PositionalError> {
        let index = self.index;
        self.index += 1;

        let taken: Vec<String> = match T::KIND {
            ValueKind::List => self.values.by_ref().collect(),
            ValueKind::Optional => match self.values.next() {
                Some(v) => vec![v],
                None => return Ok(T::zero()),
            },
            ValueKind::Flag | ValueKind::Single => match self.values.next() {
                Some(v) => vec![v],
                None => return Err(PositionalError::Missing(T::placeholder_or_bool())),
            },
        };
        T::decode(&taken).map_err(|source| PositionalError::Decode { index, source })
    }

    fn finish(self) -> Result<(), PositionalError> {
        let rest: Vec<String> = self.values.collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(PositionalError::TooMany(rest))
        }
    }
}

trait PlaceholderExt {
    fn placeholder_or_bool() -> String;
}

impl<T: Value> PlaceholderExt for T {
    fn placeholder_or_bool() -> String {
        let p = T::placeholder();
        if p.is_empty() {
            "bool".into()
        } else {
            p
        }
    }
}

macro_rules! tuple_positionals {
    ($($name:ident),+) => {
        impl<$($name: Value),+> Positionals for ($($name,)+) {
            fn layout() -> Vec<ValueKind> {
                vec![$($name::KIND),+]
            }

            fn placeholders() -> Vec<String> {
                vec![$($name::placeholder_or_bool()),+]
            }

            fn bind(values: Vec<String>) -> Result<Self, PositionalError> {
                let mut cursor = Cursor {
                    values: values.into_iter(),
                    index: 0,
                };
                let bound = ($(cursor.next::<$name>()?,)+);
                cursor.finish()?;
                Ok(bound)
            }
        }
    };
}

tuple_positionals!(A);
tuple_positionals!(A, B);
tuple_positionals!(A, B, C);
tuple_positionals!(A, B, C, D);
tuple_positionals!(A, B, C, D, E);
tuple_positionals!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bind_in_order() {
        let (x, y) = <(i64, i64)>::bind(args(&["10", "42"])).unwrap();
        assert_eq!((x, y), (10, 42));
    }

    #[test]
    fn test_missing_positional() {
        let err = <(i64, i64)>::bind(args(&["10"])).unwrap_err();
        assert_eq!(err.to_string(), "missing positional argument [i64]");
    }

    #[test]
    fn test_too_many_positionals() {
        let err = <(String,)>::bind(args(&["a", "b", "c"])).unwrap_err();
        assert_eq!(err.to_string(), "too many positional arguments: [\"b\", \"c\"]");

        let err = <()>::bind(args(&["x"])).unwrap_err();
        assert!(matches!(err, PositionalError::TooMany(_)));
    }

    #[test]
    fn test_list_absorbs_rest() {
        let (first, rest) = <(String, Vec<u32>)>::bind(args(&["a", "1", "2"])).unwrap();
        assert_eq!(first, "a");
        assert_eq!(rest, vec![1, 2]);

        let (_, rest) = <(String, Vec<u32>)>::bind(args(&["a"])).unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn test_optional_may_be_missing() {
        let (name, level) = <(String, Option<u8>)>::bind(args(&["a"])).unwrap();
        assert_eq!(name, "a");
        assert_eq!(level, None);
    }

    #[test]
    fn test_decode_error_has_index() {
        let err = <(i64, i64)>::bind(args(&["1", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "decoding positional argument 1");
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            "decoding positional argument 1: parsing \"x\": invalid syntax"
        );
    }

    #[test]
    fn test_list_must_be_last() {
        assert_eq!(
            <(Vec<String>, String)>::check(),
            Err(ConfigError::ListPositionalNotLast)
        );
        assert!(<(String, Vec<String>)>::check().is_ok());
    }

    #[test]
    fn test_synopsis() {
        assert_eq!(<()>::synopsis(), "");
        assert_eq!(<(i64, i64)>::synopsis(), " [i64] [i64]");
        assert_eq!(<(String, Vec<String>)>::synopsis(), " [string] [string...]");
        assert_eq!(<(bool,)>::synopsis(), " [bool]");
    }
}

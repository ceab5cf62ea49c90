//! Value decoding.
//!
//! Every option field and positional parameter has a type implementing
//! [`Value`]. The trait describes how the type behaves on the command line
//! (a boolean switch, a single value, an optional value or a repeatable
//! list) and how it is decoded from the collected strings.
//!
//! Single values are built from [`Scalar`] types, the decode-from-text
//! capability. The crate implements it for the primitive set:
//!
//! | Type | Accepted text |
//! |------|---------------|
//! | `bool` | `1 t T TRUE true True 0 f F FALSE false False` |
//! | `i8`..`i128`, `isize` | base-prefixed literals: `42`, `-0x2a`, `0o52`, `0b101010`, `052`, `1_000` |
//! | `u8`..`u128`, `usize` | same, without sign |
//! | `f32`, `f64` | decimal and exponent notation |
//! | `String`, `PathBuf` | any text |
//! | `IpAddr`, `Ipv4Addr`, `Ipv6Addr`, `SocketAddr` | standard notation |
//! | `Duration` | `300ms`, `1.5h`, `2h45m` |
//! | `DateTime<Utc>` | ANSI C, Unix date, Ruby, RFC 822, RFC 850, RFC 1123, RFC 3339, kitchen clock, log stamps, `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d` |
//!
//! From those, `Vec<T>` collects a repeatable option and `Option<T>` makes a
//! value optional. A plain field also needs `Default`, which supplies its
//! value when nothing is given; address types have none and are used through
//! `Option<T>` or `Vec<T>`. Other types opt in by implementing [`Scalar`] or with
//! [`from_str_scalar!`](crate::from_str_scalar).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use heck::ToKebabCase;
use thiserror::Error;

/// Boxed error returned by [`Scalar::decode_text`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// How a value is collected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A boolean switch, true when given without a value.
    Flag,
    /// Exactly one value.
    Single,
    /// Zero or one value.
    Optional,
    /// Any number of values, in command-line order.
    List,
}

impl ValueKind {
    /// Returns true for kinds that never make a field required.
    pub fn is_implicit(self) -> bool {
        !matches!(self, ValueKind::Single)
    }
}

/// Errors produced while decoding collected strings into a value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not enough arguments, expected {expected} but got {got}")]
    NotEnough { expected: usize, got: usize },

    #[error("too many arguments, expected {expected} but got {got}")]
    TooMany { expected: usize, got: usize },

    #[error(transparent)]
    Invalid(BoxError),
}

/// Errors from the built-in scalar parsers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("parsing {0:?}: invalid syntax")]
    Invalid(String),

    #[error("parsing {0:?}: value out of range")]
    Range(String),

    #[error("malformed duration: {0:?}")]
    Duration(String),

    #[error("malformed time value: {0:?}")]
    Time(String),
}

/// The decode-from-text capability of a single value.
///
/// Implement this for a type to accept it in options records and
/// positional parameters.
///
/// ```rust
/// use argot::{BoxError, Scalar};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl Scalar for Level {
///     fn type_name() -> String {
///         "level".into()
///     }
///
///     fn decode_text(text: &str) -> Result<Self, BoxError> {
///         match text {
///             "low" => Ok(Level(1)),
///             "high" => Ok(Level(9)),
///             other => Err(format!("unknown level: {:?}", other).into()),
///         }
///     }
/// }
/// ```
pub trait Scalar: Sized {
    /// Boolean scalars are switches: they default to `true` when given
    /// without a value.
    const BOOLEAN: bool = false;

    /// The placeholder shown in help output, e.g. `string` or `duration`.
    ///
    /// Defaults to the kebab-cased name of the type without its path.
    fn type_name() -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Decodes one value from its text form.
    fn decode_text(text: &str) -> Result<Self, BoxError>;
}

/// A type that can be bound from the command line.
pub trait Value: Sized {
    /// How the value is collected.
    const KIND: ValueKind;

    /// Placeholder used in help output; empty for boolean switches.
    fn placeholder() -> String;

    /// The value used when nothing was given.
    fn zero() -> Self;

    /// Decodes the collected strings.
    fn decode(values: &[String]) -> Result<Self, DecodeError>;
}

impl<T: Scalar + Default> Value for T {
    const KIND: ValueKind = if T::BOOLEAN {
        ValueKind::Flag
    } else {
        ValueKind::Single
    };

    fn placeholder() -> String {
        if T::BOOLEAN {
            String::new()
        } else {
            T::type_name()
        }
    }

    fn zero() -> Self {
        T::default()
    }

    fn decode(values: &[String]) -> Result<Self, DecodeError> {
        decode_one::<T>(values)
    }
}

impl<T: Scalar> Value for Vec<T> {
    const KIND: ValueKind = ValueKind::List;

    fn placeholder() -> String {
        format!("{}...", T::type_name())
    }

    fn zero() -> Self {
        Vec::new()
    }

    fn decode(values: &[String]) -> Result<Self, DecodeError> {
        values
            .iter()
            .map(|v| T::decode_text(v).map_err(DecodeError::Invalid))
            .collect()
    }
}

impl<T: Scalar> Value for Option<T> {
    const KIND: ValueKind = ValueKind::Optional;

    fn placeholder() -> String {
        T::type_name()
    }

    fn zero() -> Self {
        None
    }

    fn decode(values: &[String]) -> Result<Self, DecodeError> {
        decode_one::<T>(values).map(Some)
    }
}

fn decode_one<T: Scalar>(values: &[String]) -> Result<T, DecodeError> {
    match values {
        [value] => T::decode_text(value).map_err(DecodeError::Invalid),
        [] => Err(DecodeError::NotEnough {
            expected: 1,
            got: 0,
        }),
        _ => Err(DecodeError::TooMany {
            expected: 1,
            got: values.len(),
        }),
    }
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    let last = base.rsplit("::").next().unwrap_or(base);
    last.to_kebab_case()
}

/// Implements [`Scalar`] for types that already implement `FromStr`.
///
/// ```rust
/// use argot::from_str_scalar;
///
/// #[derive(Debug, Default)]
/// struct Region(String);
///
/// impl std::str::FromStr for Region {
///     type Err = std::convert::Infallible;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         Ok(Region(s.to_string()))
///     }
/// }
///
/// from_str_scalar!(Region => "region");
/// ```
#[macro_export]
macro_rules! from_str_scalar {
    ($($ty:ty => $name:expr),+ $(,)?) => {
        $(
            impl $crate::Scalar for $ty {
                fn type_name() -> ::std::string::String {
                    ::std::string::String::from($name)
                }

                fn decode_text(text: &str) -> ::std::result::Result<Self, $crate::BoxError> {
                    <$ty as ::std::str::FromStr>::from_str(text).map_err(::std::convert::Into::into)
                }
            }
        )+
    };
}

from_str_scalar!(
    PathBuf => "path",
    IpAddr => "ip",
    Ipv4Addr => "ipv4",
    Ipv6Addr => "ipv6",
    SocketAddr => "addr",
);

impl Scalar for bool {
    const BOOLEAN: bool = true;

    fn type_name() -> String {
        "bool".into()
    }

    fn decode_text(text: &str) -> Result<Self, BoxError> {
        parse_bool(text).map_err(Into::into)
    }
}

impl Scalar for String {
    fn type_name() -> String {
        "string".into()
    }

    fn decode_text(text: &str) -> Result<Self, BoxError> {
        Ok(text.to_string())
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),+) => {
        $(
            impl Scalar for $ty {
                fn type_name() -> String {
                    stringify!($ty).into()
                }

                fn decode_text(text: &str) -> Result<Self, BoxError> {
                    let value = parse_signed(text)?;
                    <$ty>::try_from(value).map_err(|_| SyntaxError::Range(text.into()).into())
                }
            }
        )+
    };
}

macro_rules! unsigned_scalar {
    ($($ty:ty),+) => {
        $(
            impl Scalar for $ty {
                fn type_name() -> String {
                    stringify!($ty).into()
                }

                fn decode_text(text: &str) -> Result<Self, BoxError> {
                    let value = parse_unsigned(text)?;
                    <$ty>::try_from(value).map_err(|_| SyntaxError::Range(text.into()).into())
                }
            }
        )+
    };
}

macro_rules! float_scalar {
    ($($ty:ty),+) => {
        $(
            impl Scalar for $ty {
                fn type_name() -> String {
                    stringify!($ty).into()
                }

                fn decode_text(text: &str) -> Result<Self, BoxError> {
                    text.parse::<$ty>()
                        .map_err(|_| SyntaxError::Invalid(text.into()).into())
                }
            }
        )+
    };
}

signed_scalar!(i8, i16, i32, i64, i128, isize);
unsigned_scalar!(u8, u16, u32, u64, u128, usize);
float_scalar!(f32, f64);

impl Scalar for Duration {
    fn type_name() -> String {
        "duration".into()
    }

    fn decode_text(text: &str) -> Result<Self, BoxError> {
        parse_duration(text).map_err(Into::into)
    }
}

impl Scalar for DateTime<Utc> {
    fn type_name() -> String {
        "time".into()
    }

    fn decode_text(text: &str) -> Result<Self, BoxError> {
        parse_time(text).map_err(Into::into)
    }
}

/// Parses the boolean literals accepted by flags and environment values.
pub fn parse_bool(text: &str) -> Result<bool, SyntaxError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(SyntaxError::Invalid(text.into())),
    }
}

/// Parses a signed integer literal, honoring base prefixes.
pub fn parse_signed(text: &str) -> Result<i128, SyntaxError> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = parse_magnitude(digits).ok_or_else(|| SyntaxError::Invalid(text.into()))?;
    let magnitude = i128::try_from(magnitude).map_err(|_| SyntaxError::Range(text.into()));
    match (negative, magnitude) {
        (true, Ok(m)) => Ok(-m),
        (false, Ok(m)) => Ok(m),
        // |i128::MIN| does not fit in i128.
        (true, Err(_)) if parse_magnitude(digits) == Some(i128::MIN.unsigned_abs()) => {
            Ok(i128::MIN)
        }
        (_, Err(e)) => Err(e),
    }
}

/// Parses an unsigned integer literal, honoring base prefixes.
pub fn parse_unsigned(text: &str) -> Result<u128, SyntaxError> {
    parse_magnitude(text).ok_or_else(|| SyntaxError::Invalid(text.into()))
}

fn parse_magnitude(text: &str) -> Option<u128> {
    let lower = text.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &text[2..], true),
        Some("0o") => (8, &text[2..], true),
        Some("0b") => (2, &text[2..], true),
        _ if text.len() > 1 && text.starts_with('0') => (8, &text[1..], true),
        _ => (10, text, false),
    };

    // Underscores may only sit between digits, or right after a prefix.
    let digits = if digits.contains('_') {
        let trimmed = match digits.strip_prefix('_') {
            Some(rest) if prefixed => rest,
            _ => digits,
        };
        if trimmed.is_empty()
            || trimmed.starts_with('_')
            || trimmed.ends_with('_')
            || trimmed.contains("__")
        {
            return None;
        }
        trimmed.replace('_', "")
    } else {
        digits.to_string()
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u128::from_str_radix(&digits, radix).ok()
}

/// Parses a duration such as `300ms`, `1.5h` or `2h45m`.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is
/// accepted; negative durations are not.
pub fn parse_duration(text: &str) -> Result<Duration, SyntaxError> {
    let err = || SyntaxError::Duration(text.into());
    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() || rest.starts_with('-') {
        return Err(err());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_end);

        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let end = tail
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(tail.len());
                tail.split_at(end)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_end);
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 60 * 60 * 1_000_000_000,
            _ => return Err(err()),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(err)?;

        if !frac_part.is_empty() {
            let digits = frac_part.len().min(18) as u32;
            let numerator: u128 = frac_part[..digits as usize].parse().map_err(|_| err())?;
            let denominator = 10u128.pow(digits);
            nanos = nanos
                .checked_add(numerator.checked_mul(scale).ok_or_else(err)? / denominator)
                .ok_or_else(err)?;
        }

        total = total.checked_add(nanos).ok_or_else(err)?;
        rest = tail;
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| err())?;
    Ok(Duration::new(secs, (total % 1_000_000_000) as u32))
}

/// How one timestamp layout is read.
enum Layout {
    /// Date and time without a zone, read as UTC.
    Naive(&'static str),
    /// Like `Naive`, once the zone name (`UTC`, `MST`) is dropped from the
    /// text. The time is read as UTC.
    Zoned(&'static str),
    /// Date and time with a numeric offset such as `+0200`.
    Offset(&'static str),
    Rfc3339,
    /// A layout without a date or a year. `prefix` supplies the missing
    /// fields from January 1st of year 0.
    Partial {
        prefix: &'static str,
        format: &'static str,
    },
}

/// Layouts tried, in order.
const TIME_LAYOUTS: &[Layout] = &[
    // ANSI C
    Layout::Naive("%a %b %e %H:%M:%S %Y"),
    // Unix date
    Layout::Zoned("%a %b %e %H:%M:%S %Y"),
    // Ruby
    Layout::Offset("%a %b %d %H:%M:%S %z %Y"),
    // RFC 822
    Layout::Zoned("%d %b %y %H:%M"),
    Layout::Offset("%d %b %y %H:%M %z"),
    // RFC 850
    Layout::Zoned("%A, %d-%b-%y %H:%M:%S"),
    // RFC 1123
    Layout::Zoned("%a, %d %b %Y %H:%M:%S"),
    Layout::Offset("%a, %d %b %Y %H:%M:%S %z"),
    Layout::Rfc3339,
    // Kitchen clock, e.g. 3:04PM
    Layout::Partial {
        prefix: "0000-01-01 ",
        format: "%Y-%m-%d %I:%M%p",
    },
    // Log stamps, with optional fractional seconds
    Layout::Partial {
        prefix: "0000 ",
        format: "%Y %b %e %H:%M:%S%.f",
    },
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
];

impl Layout {
    fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        match self {
            Layout::Naive(format) => NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|t| t.and_utc()),
            Layout::Zoned(format) => {
                let text = strip_zone_name(text)?;
                NaiveDateTime::parse_from_str(&text, format)
                    .ok()
                    .map(|t| t.and_utc())
            }
            Layout::Offset(format) => DateTime::parse_from_str(text, format)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Layout::Partial { prefix, format } => {
                NaiveDateTime::parse_from_str(&format!("{}{}", prefix, text), format)
                    .ok()
                    .map(|t| t.and_utc())
            }
        }
    }
}

/// Drops the one word that looks like a zone abbreviation.
fn strip_zone_name(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let zone = words.iter().position(|w| {
        (1..=5).contains(&w.len()) && w.chars().all(|c| c.is_ascii_uppercase())
    })?;
    let kept: Vec<&str> = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != zone)
        .map(|(_, w)| *w)
        .collect();
    Some(kept.join(" "))
}

/// Parses a timestamp, trying each known layout in turn.
///
/// Zone names such as `UTC` or `MST` are accepted and read as UTC; only
/// numeric offsets shift the time. A bare `%Y-%m-%d` date is midnight UTC.
pub fn parse_time(text: &str) -> Result<DateTime<Utc>, SyntaxError> {
    if let Some(t) = TIME_LAYOUTS.iter().find_map(|layout| layout.parse(text)) {
        return Ok(t);
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(text) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(t) = date.and_hms_opt(0, 0, 0) {
            return Ok(t.and_utc());
        }
    }

    Err(SyntaxError::Time(text.into()))
}

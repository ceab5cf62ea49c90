//! Proc macros for argot.
//!
//! This crate provides the derive macro that turns an annotated struct into
//! an options record: the schema of flags a command accepts and the code
//! that binds parsed values into a fresh instance.
//!
//! # Available Macros
//!
//! - [`Options`] - Generate `argot::Options` from `#[opt(...)]` annotations
//!
//! For working examples, see `argot/tests/derive.rs`.

mod options;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Options` trait from struct field annotations.
///
/// # Field Attributes
///
/// | Attribute | Type | Description |
/// |-----------|------|-------------|
/// | `flag` | string | Comma-separated flags, e.g. `"-n,--name"`; the last one is canonical |
/// | `help` | string | Help text shown in the options table |
/// | `default` | string | Default value text; `"-"` makes the field optional |
/// | `env` | string | Environment variable name; `"-"` disables env lookup |
/// | `hidden` | flag or bool | Leave the field out of help output |
/// | `flatten` | flag | Merge the fields of a nested `Options` type |
/// | `skip` | flag | Exclude the field; it is filled with `Default::default()` |
///
/// # Container Attributes
///
/// | Attribute | Type | Description |
/// |-----------|------|-------------|
/// | `help` | string | One-line summary of the command using this record |
///
/// # Required Fields
///
/// A field with no `default`, whose type is neither `bool`, `Vec<T>` nor
/// `Option<T>`, must be provided on the command line or through the
/// environment.
///
/// # Example
///
/// ```rust,ignore
/// use argot::Options;
///
/// #[derive(Options)]
/// #[opt(help = "Greet someone")]
/// struct Config {
///     #[opt(flag = "-n,--name", help = "Someone's name", default = "Luke")]
///     name: String,
///
///     #[opt(flag = "-v,--verbose", help = "Enable verbose mode")]
///     verbose: bool,
/// }
/// ```
///
/// # Compile-Time Errors
///
/// The macro fails to compile when:
/// - it is applied to an enum or a tuple struct
/// - a field has no `#[opt]` attribute
/// - a field has neither `flag`, `flatten` nor `skip`
/// - a flag list contains an empty name or a name not starting with `-`
/// - a field type does not implement `argot::Value`
#[proc_macro_derive(Options, attributes(opt))]
pub fn options_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    options::options_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

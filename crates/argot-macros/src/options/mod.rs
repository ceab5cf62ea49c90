//! Implementation of the `#[derive(Options)]` macro.
//!
//! This module turns `#[opt(...)]` struct annotations into an
//! implementation of `argot::Options`: a field schema plus a binder that
//! builds a fresh record from parsed option values.

mod attrs;
mod derive;

pub use derive::options_derive_impl;

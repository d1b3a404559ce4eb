//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! This module provides derive macro support for standout-search,
//! generating compiled field accessors and field constants from struct
//! annotations.

mod attrs;
mod derive;

pub use derive::searchable_derive_impl;

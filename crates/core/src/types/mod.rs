//! Core types for Pepper Menu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod language;
pub mod price;

pub use id::*;
pub use language::{Language, TextField, TranslationEntry, Translations};
pub use price::{format_eur, parse_amount};

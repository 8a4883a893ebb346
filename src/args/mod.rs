// src/args/mod.rs

//! Argument model.
//!
//! Turns a mutable set of key/value options into the token vector passed to
//! the encoder, and parses free text back into options.
//!
//! - [`value`] defines [`OptionValue`] and its emission rules.
//! - [`map`] is the insertion-ordered [`OptionMap`].
//! - [`set`] holds [`ArgumentSet`]: base map, overlay, disabled names.
//! - [`parse`] re-hydrates maps from text in either style.

pub mod map;
pub mod parse;
pub mod set;
pub mod value;

pub use map::OptionMap;
pub use set::ArgumentSet;
pub use value::OptionValue;

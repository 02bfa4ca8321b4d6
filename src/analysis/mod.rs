// src/analysis/mod.rs
//! Light lexical analysis over the persisted merged table.
//!
//! Both analyses take their lookup tables as values built once by the caller;
//! nothing here reads global state.

pub mod characters;
pub mod lexicon;

pub use characters::{Character, NameTable};
pub use lexicon::Lexicon;

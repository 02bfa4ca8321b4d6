// src/core/mod.rs

pub mod parse;
pub mod sanitize;

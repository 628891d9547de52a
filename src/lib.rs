//! jymp: combine project files into a single LLM prompt
//!
//! This library discovers the files of a working tree, narrows them with a
//! selection strategy, classifies and optionally compresses each one, and
//! assembles the result into one document with per-file section headers.

pub mod classify;
pub mod cli;
pub mod compress;
pub mod config;
pub mod domain;
pub mod render;
pub mod scan;
pub mod select;
pub mod utils;

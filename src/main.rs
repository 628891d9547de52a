//! jymp: combine project files into a single LLM prompt
//!
//! Scans the working directory, lets the user pick files (everything, by
//! goal, or from a tree), and copies the assembled prompt to the clipboard.

use anyhow::Result;

mod classify;
mod cli;
mod compress;
mod config;
mod domain;
mod render;
mod scan;
mod select;
mod utils;

fn main() -> Result<()> {
    cli::run()
}

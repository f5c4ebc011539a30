//! Synthetic form-tree generator.
//!
//! Builds random form/field hierarchies against a component catalog, removes
//! one node with a depth-biased draw, and renders the tree as form-language
//! text and English prose for training data.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

#![doc = "highlight-export-core: core logic library for highlight-export."]

//! Turns a flat stream of highlighted quotes into one Markdown document per
//! book. Fetching and storage sit behind the traits in [`contract`]; the
//! aggregation and rendering in between are pure.
//!
//! # Usage
//! Fetch with [`download::fetch_all`], then hand the quotes to
//! [`export::export`] together with a [`render::DocumentRenderer`] and a
//! [`contract::DocumentStore`].

pub mod aggregate;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod export;
pub mod model;
pub mod render;
pub mod store;

pub use error::{ExportError, Result};

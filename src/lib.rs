//! Theme discovery and labeling for app review batches.

pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod pipeline;
pub mod themes;

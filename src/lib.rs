//! quotebox library
//!
//! Fetches a short quote by racing two public providers, keeps a bounded cache
//! of what it has seen for offline use, and falls back to a hardcoded quote
//! when nothing else works.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod reachability;
pub mod slideshow;

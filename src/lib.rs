//! Themekit CLI - sync local storefront theme files with a remote theme API.
//!
//! This crate provides the core functionality for the `themekit` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Per-environment `config.yml` handling
//! - [`gateway`] - HTTP client for the theme-management API
//! - [`classify`] - File classification (media vs content, allow-list)
//! - [`sync`] - Change reconciliation and pull/checkout engine
//! - [`watch`] - Debounced filesystem watcher
//! - [`sass`] - External Sass compiler invocation
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod sass;
pub mod sync;
pub mod watch;

pub use error::{Error, Result};

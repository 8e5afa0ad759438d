//! Shared test utilities for the weather-tiles workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A scriptable, call-counting [`StubWeatherProvider`]
//! - Weather record and upstream payload fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, StubWeatherProvider};
//! ```

pub mod fixtures;
pub mod stub;

pub use stub::{StubResponse, StubWeatherProvider};

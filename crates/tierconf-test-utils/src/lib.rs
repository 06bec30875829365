//! Shared test utilities for the tierconf workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`group`]: the `languageTool` settings group used across tests
//! - [`workspace`]: [`TestWorkspace`] builder for file-backed hosts

pub mod group;
pub mod workspace;

pub use group::{LanguageField, LanguageTool};
pub use workspace::TestWorkspace;

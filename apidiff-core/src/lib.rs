//! apidiff core - structural diff engine for OpenAPI 3 documents.
//!
//! Compares a base and a revision document and produces a diff tree that
//! mirrors the documents' shape, then classifies which of the changes break
//! existing clients.
//!
//! # Features
//!
//! - **Structural diff**: paths, operations, parameters, bodies, responses,
//!   schemas, security, servers, tags and components
//! - **Recursive schemas**: self-referencing schemas are compared without looping
//! - **Breaking-change classification**: direction-aware rules for request and
//!   response data
//! - **Filtering**: path regex, extension regex and path prefix remapping
//! - **Summaries**: per-section added/deleted/modified counts
//!
//! # Usage
//!
//! ```
//! use apidiff_core::{compare, Config, OpenApi};
//!
//! let base: OpenApi = serde_json::from_str(r#"{
//!     "openapi": "3.0.3",
//!     "info": {"title": "Pets", "version": "1"},
//!     "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
//! }"#).unwrap();
//! let revision: OpenApi = serde_json::from_str(r#"{
//!     "openapi": "3.0.3",
//!     "info": {"title": "Pets", "version": "2"},
//!     "paths": {}
//! }"#).unwrap();
//!
//! let diff = compare(&Config::default(), &base, &revision);
//! assert_eq!(diff.paths_diff.as_ref().unwrap().deleted, vec!["/pets"]);
//! assert!(diff.summary().breaking);
//! ```

pub mod breaking;
pub mod config;
pub mod diff;
pub mod error;
pub mod openapi;
pub mod summary;

pub use breaking::{breaking_only, classify, BreakingChange, Direction};
pub use config::Config;
pub use diff::{compare, Diff, Empty};
pub use error::{Error, Result};
pub use openapi::OpenApi;
pub use summary::{Section, Summary, SummaryDetails};

//! Core library for the boardsheet command line application.
//!
//! The library migrates a Trello board export into a collaboration sheet:
//! lists become lane options, cards become rows, and comment activity
//! becomes per-row discussions. The modules are structured to keep the
//! pipeline stages narrow and composable: the export and mapping readers
//! live under [`io`], the parsed board in [`model`], the per-run indexes in
//! [`lookup`] and [`email`], the derived sheet in [`schema`] and [`rows`],
//! comment aggregation in [`comments`], the sheet-service boundary in
//! [`sheets`], and the orchestration under [`migrate`].

pub mod comments;
pub mod email;
pub mod error;
pub mod io;
pub mod lookup;
pub mod migrate;
pub mod model;
pub mod rows;
pub mod schema;
pub mod sheets;

pub use error::{MigrateError, Result};

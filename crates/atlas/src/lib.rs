//! Atlas - a reverse index of symbolic links.
//!
//! Scans directory trees for symlinks, records which links point at each
//! real target, and answers "what breaks if I change this path?" by looking
//! up the path and every directory above it.
//!
//! The binary wires these modules to the command line; the library can be
//! used directly:
//!
//! ```no_run
//! use atlas::query::query;
//! use atlas::scanner::Scanner;
//!
//! let report = Scanner::new().scan(&["/srv/shared"]);
//! let answer = query(&report.index, &["/srv/shared/datasets"])?;
//! for link in answer.affected() {
//!     println!("{}", link.display());
//! }
//! # Ok::<(), atlas::Error>(())
//! ```

#![forbid(unsafe_code)]

// Core library modules
pub mod domain;
pub mod error;
pub mod merge;
pub mod query;
pub mod resolve;
pub mod scanner;
pub mod storage;

// Configuration and side effects
pub mod config;
pub mod remove;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;

pub use error::{Error, Result};

//! Library half of the `tonic-transcode` command-line tool.
//!
//! Loads project config files ([`ProjectConfig`]) and turns resolved
//! transcoding bindings into a serializable [`Report`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod report;

pub use config::ProjectConfig;
pub use error::{Error, Result};
pub use report::{BindingReport, BodyReport, FieldReport, Report, ServiceReport};

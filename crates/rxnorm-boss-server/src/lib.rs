//! Outer surfaces for RxNorm BoSS snapshots.
//!
//! [`cli`] drives one pipeline run and then writes the HTML report, prints
//! the statistics or serves the read-only [`api`].

pub mod api;
pub mod cli;

pub use api::{router, SharedSnapshot};
pub use cli::{Cli, Command, DataArgs};

//! Pipeline stages for executing submitted Python source:
//! dependency extraction, package resolution and installation, execution
//! in an ephemeral working tree, and media artifact harvesting.
//!
//! Stages are synchronous and independent; each consumes only the prior
//! stage's output. The only cross-request state is the installer's memo of
//! packages already confirmed present.

pub mod augment;
pub mod common;
pub mod deps;
pub mod harvest;
pub mod install;
pub mod resolve;
pub mod runner;
pub mod workdir;

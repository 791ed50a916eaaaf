//! pybox core: configuration, error taxonomy, the `ExecutionResult` wire
//! type, and tracing initialisation.
//!
//! This crate carries no pipeline logic; it is the shared vocabulary between
//! `pybox-sandbox` (the pipeline stages) and the `pybox` executor crate.

pub mod config;
pub mod error;
pub mod observability;
pub mod result;

//! Release pipeline internals: configuration, process execution, and the
//! individual pipeline steps (`check`, `clean`, `build`, `verify`, `publish`).

pub(crate) mod artifacts;
pub(crate) mod build;
pub(crate) mod checks;
pub(crate) mod clean;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod manifest;
pub(crate) mod outcome;
pub(crate) mod process;
pub(crate) mod publish;
pub(crate) mod release;
pub(crate) mod report;
pub(crate) mod verify;

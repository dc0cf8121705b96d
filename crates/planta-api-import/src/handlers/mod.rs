//! HTTP handlers for the import/export endpoints.

pub mod import;

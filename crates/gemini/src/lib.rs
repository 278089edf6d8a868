//! Client for the Google Generative Language REST API.
//!
//! Provides typed wire DTOs, an HTTP wrapper around the file-upload,
//! file-status, model-listing, and content-generation endpoints, a
//! bounded cancellable polling routine for remote media processing, and
//! the [`service::RemoteAuditService`] trait the API layer consumes.

pub mod client;
pub mod files;
pub mod poll;
pub mod service;

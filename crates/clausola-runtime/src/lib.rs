//! Clausola runtime: the analysis pipeline and the document service.
//!
//! A [`Pipeline`] is built once from configuration and reused for every
//! document. [`DocumentService`] adds upload handling and persistence.

pub mod pipeline;
pub mod service;
pub mod types;

pub use pipeline::Pipeline;
pub use service::DocumentService;
pub use types::*;

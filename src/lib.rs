//! Detection Meter
//!
//! A small web service that asks a hosted generative model how much of a
//! piece of text, a PDF (first page) or a Word document is AI-generated,
//! and renders the answer as a percentage meter.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod presentation;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::{create_router, AppState};

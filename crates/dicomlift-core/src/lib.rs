//! Dicomlift Core Library
//!
//! This crate provides the shared domain models and pipeline constants used
//! across all dicomlift components: the study/series/instance tree, study
//! lifecycle status, session credentials, and the deployment configuration
//! delivered by the session-validation endpoint.

pub mod constants;
pub mod models;

// Re-export commonly used types
pub use models::{
    AppConfig, DicomFileInfo, Instance, Series, SigningCredentials, StsCredentials, Study,
    StudyStatus,
};

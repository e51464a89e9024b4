//! Analysis backend client.
//!
//! The backend describes photos, reads printed text, processes documents
//! and synthesizes speech. Results are turned into text for the speech
//! controller.

pub mod client;
pub mod types;

pub use client::{BackendClient, DescribeMode};
pub use types::{
    AnalysisResponse, ApiError, BackendVoice, DocumentStructure, ExtractedDocument, VisionLabel,
};

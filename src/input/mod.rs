//! Input processing module
//! Handles file detection, text extraction, and corpus loading

pub mod corpus;
pub mod file_detector;
pub mod text_extractor;

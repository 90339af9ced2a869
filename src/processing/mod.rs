//! Keyword extraction and matching module

pub mod matcher;
pub mod rake;
pub mod stopwords;

//! Match report structures built from a corpus scan

use crate::config::MatchPolicy;
use crate::input::corpus::CorpusDocument;
use crate::processing::matcher::MatchMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::SystemTime;

/// Full result of matching one query against one corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// The query and its normalized tokens
    pub query: QuerySummary,

    /// Per-document results in corpus order
    pub documents: Vec<DocumentReport>,

    /// Corpus-level counts
    pub summary: CorpusSummary,

    /// Report metadata and generation info
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySummary {
    /// The query as typed
    pub raw: String,

    /// Significant tokens after normalization, sorted for stable output
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document id (the file name)
    pub id: String,

    /// Full path of the source file
    pub path: String,

    /// Ranked keyword phrases, best first
    pub keywords: Vec<String>,

    /// Whether the query matched this document
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_documents: usize,
    pub matched_documents: usize,
    /// Documents whose text was empty or unreadable
    pub empty_documents: usize,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: SystemTime,

    /// Version of keysift used
    pub tool_version: String,

    /// Corpus directory that was scanned
    pub corpus_dir: String,

    /// Match policy in effect
    pub policy: MatchPolicy,

    /// Total processing time
    pub processing_time_ms: u64,
}

/// Scan context carried into the report metadata.
pub struct ScanInfo {
    pub corpus_dir: String,
    pub policy: MatchPolicy,
    pub processing_time_ms: u64,
}

impl MatchReport {
    /// Assemble a report from the matcher's results and the loaded corpus.
    pub fn from_match_results(
        query: &str,
        query_tokens: &HashSet<String>,
        documents: &[CorpusDocument],
        results: &MatchMap,
        scan: ScanInfo,
    ) -> Self {
        let query = Self::create_query_summary(query, query_tokens);
        let document_reports = Self::create_document_reports(documents, results);
        let summary = Self::create_summary(documents, &document_reports);
        let metadata = Self::create_metadata(scan);

        Self {
            query,
            documents: document_reports,
            summary,
            metadata,
        }
    }

    /// Documents that matched, in corpus order.
    pub fn matched_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|doc| doc.matched)
    }

    fn create_query_summary(query: &str, query_tokens: &HashSet<String>) -> QuerySummary {
        let mut tokens: Vec<String> = query_tokens.iter().cloned().collect();
        tokens.sort();

        QuerySummary {
            raw: query.to_string(),
            tokens,
        }
    }

    fn create_document_reports(
        documents: &[CorpusDocument],
        results: &MatchMap,
    ) -> Vec<DocumentReport> {
        documents
            .iter()
            .map(|doc| {
                let result = results.get(&doc.id);
                DocumentReport {
                    id: doc.id.clone(),
                    path: doc.path.display().to_string(),
                    keywords: result.map(|r| r.keywords.clone()).unwrap_or_default(),
                    matched: result.map(|r| r.matched).unwrap_or(false),
                }
            })
            .collect()
    }

    fn create_summary(
        documents: &[CorpusDocument],
        document_reports: &[DocumentReport],
    ) -> CorpusSummary {
        CorpusSummary {
            total_documents: document_reports.len(),
            matched_documents: document_reports.iter().filter(|doc| doc.matched).count(),
            empty_documents: documents
                .iter()
                .filter(|doc| doc.text.trim().is_empty())
                .count(),
        }
    }

    fn create_metadata(scan: ScanInfo) -> ReportMetadata {
        ReportMetadata {
            generated_at: SystemTime::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            corpus_dir: scan.corpus_dir,
            policy: scan.policy,
            processing_time_ms: scan.processing_time_ms,
        }
    }
}

//! Corpus directory loading

use crate::config::CorpusConfig;
use crate::error::{KeysiftError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::fs;

/// One file loaded from the corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    /// File name, unique within the corpus directory.
    pub id: String,
    pub path: PathBuf,
    pub text: String,
}

/// Loads corpus files into memory, routing each to the right extractor.
pub struct CorpusLoader {
    extensions: Vec<String>,
    cache: HashMap<String, String>,
    enable_cache: bool,
    show_progress: bool,
}

impl CorpusLoader {
    pub fn new(config: &CorpusConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            cache: HashMap::new(),
            enable_cache: config.enable_cache,
            show_progress: config.show_progress,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_progress(mut self, enable: bool) -> Self {
        self.show_progress = enable;
        self
    }

    /// Load every eligible file directly under `dir`, sorted by file name.
    ///
    /// A file whose extraction fails stays in the corpus with empty text,
    /// so one unreadable document never aborts the scan. Subdirectories
    /// are not descended into.
    pub async fn load_dir(&mut self, dir: &Path) -> Result<Vec<CorpusDocument>> {
        if !dir.is_dir() {
            return Err(KeysiftError::CorpusNotFound(dir.display().to_string()));
        }

        let mut paths = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && self.is_corpus_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let progress = self.create_progress_bar(paths.len() as u64);

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let id = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            let text = match self.extract_file(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not read '{}': {}", path.display(), e);
                    String::new()
                }
            };

            documents.push(CorpusDocument { id, path, text });
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        info!("Loaded {} documents from {}", documents.len(), dir.display());
        Ok(documents)
    }

    /// Extract text from a single file, using the cache when enabled.
    pub async fn extract_file(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(KeysiftError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(KeysiftError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn is_corpus_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    fn create_progress_bar(&self, total: u64) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} files")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new(&CorpusConfig::default())
    }
}

/// Index loaded documents by id for the matcher.
pub fn to_document_map(documents: &[CorpusDocument]) -> BTreeMap<String, String> {
    documents
        .iter()
        .map(|doc| (doc.id.clone(), doc.text.clone()))
        .collect()
}

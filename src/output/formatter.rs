//! Output formatters for match reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{DocumentReport, MatchReport};
use aho_corasick::AhoCorasick;
use colored::{Color, Colorize};
use serde_json;
use std::path::Path;

/// Trait for formatting match reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and query-hit highlighting
pub struct ConsoleFormatter {
    use_colors: bool,
    show_unmatched: bool,
    max_keywords: usize,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, show_unmatched: bool, max_keywords: usize) -> Self {
        Self {
            use_colors,
            show_unmatched,
            max_keywords,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!(
                "\n{} {}\n",
                prefix.color(color).bold(),
                title.color(color).bold()
            )
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_match_badge(&self, matched: bool) -> String {
        let (badge, color) = if matched {
            ("MATCH", Color::Green)
        } else {
            ("NO MATCH", Color::BrightBlack)
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    /// Color the parts of a phrase that the query tokens hit.
    ///
    /// Byte offsets from the lowercased scan are only reused on ASCII
    /// phrases, where lowercasing cannot shift them.
    fn highlight_phrase(&self, phrase: &str, automaton: Option<&AhoCorasick>) -> String {
        let automaton = match automaton {
            Some(automaton) if self.use_colors && phrase.is_ascii() => automaton,
            _ => return phrase.to_string(),
        };

        let phrase_lower = phrase.to_lowercase();
        let mut output = String::new();
        let mut cursor = 0;

        for hit in automaton.find_iter(phrase_lower.as_str()) {
            output.push_str(&phrase[cursor..hit.start()]);
            output.push_str(
                &phrase[hit.start()..hit.end()]
                    .color(Color::Yellow)
                    .bold()
                    .to_string(),
            );
            cursor = hit.end();
        }
        output.push_str(&phrase[cursor..]);

        output
    }

    fn format_keywords(&self, doc: &DocumentReport, automaton: Option<&AhoCorasick>) -> String {
        let shown: Vec<String> = doc
            .keywords
            .iter()
            .take(self.max_keywords)
            .map(|phrase| self.highlight_phrase(phrase, automaton))
            .collect();

        let mut line = shown.join(", ");
        if doc.keywords.len() > self.max_keywords {
            line.push_str(&self.colorize(
                &format!(" (+{} more)", doc.keywords.len() - self.max_keywords),
                Color::BrightBlack,
            ));
        }
        line
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let automaton = if report.query.tokens.is_empty() {
            None
        } else {
            AhoCorasick::new(&report.query.tokens).ok()
        };

        let mut output = String::new();

        output.push_str(&self.format_header("🔎 KEYWORD MATCH REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
                .format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Query", 2));
        output.push_str(&format!("Raw: \"{}\"\n", report.query.raw));
        if report.query.tokens.is_empty() {
            output.push_str(&format!(
                "Tokens: {}\n",
                self.colorize("(none after stopword removal)", Color::Yellow)
            ));
        } else {
            output.push_str(&format!(
                "Tokens: {}\n",
                self.colorize(&report.query.tokens.join(", "), Color::Cyan)
            ));
        }
        output.push_str(&format!("Policy: {}\n", report.metadata.policy.as_str()));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Documents scanned: {}\n",
            report.summary.total_documents
        ));
        output.push_str(&format!(
            "Matched: {}\n",
            self.colorize(
                &report.summary.matched_documents.to_string(),
                if report.summary.matched_documents > 0 {
                    Color::Green
                } else {
                    Color::Red
                }
            )
        ));
        if report.summary.empty_documents > 0 {
            output.push_str(&format!(
                "Empty or unreadable: {}\n",
                self.colorize(&report.summary.empty_documents.to_string(), Color::Yellow)
            ));
        }

        output.push_str(&self.format_header("📄 Matched Documents", 2));
        if report.summary.matched_documents == 0 {
            output.push_str(&format!(
                "{}\n",
                self.colorize("No documents matched the query.", Color::Yellow)
            ));
        }
        for (i, doc) in report.matched_documents().enumerate() {
            output.push_str(&format!(
                "{}. {} {}\n",
                i + 1,
                self.colorize(&doc.id, Color::White),
                self.format_match_badge(doc.matched)
            ));
            output.push_str(&format!(
                "   Keywords: {}\n",
                self.format_keywords(doc, automaton.as_ref())
            ));
        }

        if self.show_unmatched {
            output.push_str(&self.format_header("Unmatched Documents", 2));
            for doc in report.documents.iter().filter(|doc| !doc.matched) {
                output.push_str(&format!(
                    "• {} {}\n",
                    doc.id,
                    self.colorize(&format!("({})", doc.path), Color::BrightBlack)
                ));
                if !doc.keywords.is_empty() {
                    output.push_str(&format!(
                        "  Keywords: {}\n",
                        self.format_keywords(doc, None)
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn keyword_cell(doc: &DocumentReport, limit: usize) -> String {
        if doc.keywords.is_empty() {
            return String::new();
        }

        let mut cell = format!(
            "`{}`",
            doc.keywords
                .iter()
                .take(limit)
                .cloned()
                .collect::<Vec<_>>()
                .join("`, `")
        );
        if doc.keywords.len() > limit {
            cell.push_str(&format!(" (+{} more)", doc.keywords.len() - limit));
        }
        cell
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 🔎 Keyword Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
                    .format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Corpus:** `{}` | **Policy:** `{}`\n\n",
                report.metadata.corpus_dir,
                report.metadata.policy.as_str()
            ));
        }

        output.push_str("## Query\n\n");
        output.push_str(&format!("**Raw:** `{}`\n\n", report.query.raw));
        if report.query.tokens.is_empty() {
            output.push_str("**Tokens:** _none after stopword removal_\n\n");
        } else {
            output.push_str(&format!(
                "**Tokens:** `{}`\n\n",
                report.query.tokens.join("`, `")
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Count |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!(
            "| Documents scanned | {} |\n",
            report.summary.total_documents
        ));
        output.push_str(&format!(
            "| Matched | {} |\n",
            report.summary.matched_documents
        ));
        output.push_str(&format!(
            "| Empty or unreadable | {} |\n\n",
            report.summary.empty_documents
        ));

        output.push_str("## Results\n\n");
        output.push_str("| Document | Matched | Top Keywords |\n");
        output.push_str("|----------|---------|---------------|\n");
        for doc in &report.documents {
            output.push_str(&format!(
                "| `{}` | {} | {} |\n",
                doc.id,
                if doc.matched { "✅" } else { "—" },
                Self::keyword_cell(doc, 5)
            ));
        }
        output.push('\n');

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false, 5),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        show_unmatched: bool,
        max_keywords: usize,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, show_unmatched, max_keywords),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, query: &str, timestamp: bool) -> String {
    let slug: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .take(4)
        .collect::<Vec<_>>()
        .join("_");

    let base_name = if slug.is_empty() { "query" } else { &slug };

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_matches{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_matches{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_matches{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchPolicy;
    use crate::input::corpus::CorpusDocument;
    use crate::output::report::ScanInfo;
    use crate::processing::matcher::{DocumentMatch, MatchMap};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn sample_report() -> MatchReport {
        let documents = vec![
            CorpusDocument {
                id: "analysis.txt".to_string(),
                path: PathBuf::from("corpus/analysis.txt"),
                text: "machine learning method".to_string(),
            },
            CorpusDocument {
                id: "other.txt".to_string(),
                path: PathBuf::from("corpus/other.txt"),
                text: "gardening tips".to_string(),
            },
        ];

        let mut results = MatchMap::new();
        results.insert(
            "analysis.txt".to_string(),
            DocumentMatch {
                keywords: vec!["machine learning".to_string(), "method".to_string()],
                matched: true,
            },
        );
        results.insert(
            "other.txt".to_string(),
            DocumentMatch {
                keywords: vec!["gardening tips".to_string()],
                matched: false,
            },
        );

        let tokens: HashSet<String> =
            ["machine".to_string(), "learning".to_string()].into_iter().collect();

        MatchReport::from_match_results(
            "machine learning",
            &tokens,
            &documents,
            &results,
            ScanInfo {
                corpus_dir: "corpus".to_string(),
                policy: MatchPolicy::Substring,
                processing_time_ms: 7,
            },
        )
    }

    #[test]
    fn test_console_format_lists_matches() {
        let formatter = ConsoleFormatter::new(false, false, 5);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("KEYWORD MATCH REPORT"));
        assert!(output.contains("analysis.txt"));
        assert!(output.contains("machine learning"));
        assert!(!output.contains("other.txt"));
    }

    #[test]
    fn test_console_shows_unmatched_when_enabled() {
        let formatter = ConsoleFormatter::new(false, true, 5);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("other.txt"));
        assert!(output.contains("gardening tips"));
    }

    #[test]
    fn test_console_truncates_keywords() {
        let formatter = ConsoleFormatter::new(false, false, 1);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("(+1 more)"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_report(&sample_report()).unwrap();

        let parsed: MatchReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.summary.matched_documents, 1);
        assert_eq!(parsed.query.tokens, vec!["learning", "machine"]);
    }

    #[test]
    fn test_markdown_format_has_result_table() {
        let formatter = MarkdownFormatter::new(true);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("# 🔎 Keyword Match Report"));
        assert!(output.contains("| `analysis.txt` | ✅ |"));
        assert!(output.contains("| `other.txt` | — |"));
    }

    #[test]
    fn test_suggest_filename_slugs_query() {
        let name = suggest_filename(&OutputFormat::Json, "Machine Learning!", false);
        assert_eq!(name, "machine_learning_matches.json");

        let fallback = suggest_filename(&OutputFormat::Markdown, "???", false);
        assert_eq!(fallback, "query_matches.md");
    }
}

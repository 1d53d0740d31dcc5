//! Locate gene-linked PCR primer sequences and expression-change evidence in
//! PubMed Central full-text articles, and export the findings as a minimal
//! one-sheet XLSX workbook plus structured records.

pub mod article_text;
pub mod crawl;
pub mod eutils;
pub mod gene_pattern;
pub mod output_path;
pub mod primer_extraction;
pub mod primer_rows;
pub mod xlsx;

pub use crawl::{ArticleRecord, CrawlConfig};
pub use gene_pattern::{GenePattern, MentionSpan};
pub use primer_rows::OutputRow;

//! Sequential crawl driver: search PMC, fetch each article, and run the
//! extraction pipeline over its body text.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::article_text;
use crate::eutils::PmcClient;
use crate::gene_pattern::{DEFAULT_GENE, GenePattern};
use crate::primer_extraction;

pub const DEFAULT_QUERY: &str = "IL11 human (stomach OR gastric) (PCR OR qPCR) \
                                 (primer OR \"forward primer\" OR \"reverse primer\" OR sequence)";
pub const DEFAULT_ARTICLE_LIMIT: usize = 200;
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Explicit crawl parameters. Callers build this once; no process-level
/// defaults are consulted afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub query: String,
    pub target_gene: String,
    pub gene_label: String,
    pub article_limit: usize,
    pub page: usize,
    pub page_size: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            target_gene: DEFAULT_GENE.to_string(),
            gene_label: DEFAULT_GENE.to_string(),
            article_limit: DEFAULT_ARTICLE_LIMIT,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One processed article and everything extracted from it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub pmcid: String,
    pub url: String,
    pub has_primers: bool,
    pub primers: Vec<String>,
    pub success_evidence: bool,
}

pub fn article_url(pmcid: &str) -> String {
    format!("https://pmc.ncbi.nlm.nih.gov/articles/{pmcid}/")
}

/// Search, fetch, and extract primer data for each PMCID.
///
/// Progress lines go through the injected `progress` sink so any front-end
/// can render them. One article failing never aborts the others: fetch or
/// parse errors yield a record with no primers, while articles without a
/// gene mention outside the references are skipped entirely.
pub fn crawl<F: FnMut(&str)>(
    config: &CrawlConfig,
    client: &PmcClient,
    progress: &mut F,
) -> Vec<ArticleRecord> {
    let pattern = GenePattern::compile(&config.target_gene);
    let retstart = config.page.saturating_mul(config.page_size);

    progress(&format!(
        "Searching PMC for query: '{}' (start={}, size={})",
        config.query, retstart, config.page_size
    ));
    let mut pmc_ids = match client.search(&config.query, retstart, config.page_size) {
        Ok(ids) => ids,
        Err(e) => {
            progress(&format!(
                "ERROR: search failed for query '{}': {e}",
                config.query
            ));
            return Vec::new();
        }
    };
    progress(&format!("Found {} PMC IDs", pmc_ids.len()));
    pmc_ids.truncate(config.article_limit);
    progress(&format!(
        "Processing {} articles from offset {retstart}",
        pmc_ids.len()
    ));

    let mut records = Vec::new();
    for pmcid in &pmc_ids {
        let mut primers = Vec::new();
        let mut success_evidence = false;

        progress(&format!("Fetching XML for {pmcid}"));
        match fetch_body_text(client, pmcid) {
            Ok(full_text) => {
                let body = article_text::body_without_references(&full_text);
                let mentions = pattern.find_mentions(body);
                if mentions.is_empty() {
                    progress(&format!(
                        "{pmcid}: skipping (no {} mention outside references)",
                        config.gene_label
                    ));
                    continue;
                }
                primers = primer_extraction::extract_gene_primers(body, &mentions);
                success_evidence = primer_extraction::has_gene_success_evidence(body, &mentions);
                progress(&format!(
                    "{pmcid}: extracted {} {}-linked primer sequences; success evidence={success_evidence}",
                    primers.len(),
                    config.gene_label
                ));
            }
            Err(e) => progress(&format!("ERROR: {e}")),
        }

        records.push(ArticleRecord {
            pmcid: pmcid.clone(),
            url: article_url(pmcid),
            has_primers: !primers.is_empty(),
            primers,
            success_evidence,
        });
    }
    records
}

fn fetch_body_text(client: &PmcClient, pmcid: &str) -> Result<String> {
    let xml = client
        .fetch_article_xml(pmcid)
        .map_err(|e| anyhow!("fetch failed for {pmcid}: {e}"))?;
    article_text::flatten_article_xml(&xml)
        .map_err(|e| anyhow!("could not parse XML for {pmcid}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_well_known_values() {
        let config = CrawlConfig::default();
        assert_eq!(config.target_gene, "IL11");
        assert_eq!(config.gene_label, "IL11");
        assert_eq!(config.article_limit, 200);
        assert_eq!(config.page, 0);
        assert_eq!(config.page_size, 200);
        assert!(config.query.starts_with("IL11 human"));
    }

    #[test]
    fn test_article_url_shape() {
        assert_eq!(
            article_url("PMC123"),
            "https://pmc.ncbi.nlm.nih.gov/articles/PMC123/"
        );
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CrawlConfig {
            query: "EGR1 primer".to_string(),
            target_gene: "EGR1".to_string(),
            gene_label: "EGR1".to_string(),
            article_limit: 10,
            page: 2,
            page_size: 50,
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: CrawlConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.query, config.query);
        assert_eq!(back.page, 2);
    }
}

//! NCBI E-utilities client for the PMC database.
//!
//! Endpoints used:
//!   esearch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!   efetch:  https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi

use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;

pub const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
pub const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking HTTP client for PMC searches and full-article fetches.
pub struct PmcClient {
    client: Client,
}

impl PmcClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("primerseek/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Could not build HTTP client: {e}"))?;
        Ok(Self { client })
    }

    /// Search PMC for the query and return normalized `PMC…` identifiers.
    pub fn search(&self, query: &str, retstart: usize, retmax: usize) -> Result<Vec<String>> {
        let params = [
            ("db", "pmc".to_string()),
            ("retmax", retmax.to_string()),
            ("retstart", retstart.to_string()),
            ("retmode", "xml".to_string()),
            ("term", query.to_string()),
        ];
        let xml = self
            .client
            .get(ESEARCH_URL)
            .query(&params)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| anyhow!("Could not search PMC: {e}"))?
            .text()
            .map_err(|e| anyhow!("Could not read search response: {e}"))?;
        parse_esearch_ids(&xml)
    }

    /// Full article XML for one PMCID, as returned by efetch.
    pub fn fetch_article_xml(&self, pmcid: &str) -> Result<String> {
        let params = [
            ("db", "pmc".to_string()),
            ("id", pmcid.to_string()),
            ("retmode", "xml".to_string()),
        ];
        self.client
            .get(EFETCH_URL)
            .query(&params)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| anyhow!("Could not fetch '{pmcid}': {e}"))?
            .text()
            .map_err(|e| anyhow!("Could not read article body for '{pmcid}': {e}"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename = "eSearchResult")]
struct ESearchResultXml {
    #[serde(rename = "IdList", default)]
    id_list: IdListXml,
}

#[derive(Debug, Default, Deserialize)]
struct IdListXml {
    #[serde(rename = "Id", default)]
    ids: Vec<String>,
}

fn parse_esearch_ids(xml: &str) -> Result<Vec<String>> {
    let parsed: ESearchResultXml =
        quick_xml::de::from_str(xml).map_err(|e| anyhow!("Could not parse search XML: {e}"))?;
    Ok(parsed
        .id_list
        .ids
        .iter()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            if raw.starts_with("PMC") {
                raw.to_string()
            } else {
                format!("PMC{raw}")
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_esearch_ids_adds_pmc_prefix() {
        let xml = r#"<?xml version="1.0"?>
<eSearchResult>
  <Count>2</Count>
  <RetMax>2</RetMax>
  <RetStart>0</RetStart>
  <IdList>
    <Id>3539452</Id>
    <Id>PMC7001234</Id>
  </IdList>
</eSearchResult>"#;
        let ids = parse_esearch_ids(xml).unwrap();
        assert_eq!(ids, vec!["PMC3539452".to_string(), "PMC7001234".to_string()]);
    }

    #[test]
    fn test_parse_esearch_ids_handles_empty_list() {
        let xml = r#"<eSearchResult><Count>0</Count><IdList/></eSearchResult>"#;
        assert!(parse_esearch_ids(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_esearch_ids_rejects_malformed_xml() {
        assert!(parse_esearch_ids("not xml at all").is_err());
    }
}

use crate::crawl::ArticleRecord;

/// One spreadsheet row: a primer pair anchored to its source article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub gene: String,
    pub url: String,
    pub forward: String,
    pub reverse: String,
}

impl OutputRow {
    #[inline(always)]
    pub fn cells(&self) -> [&str; 4] {
        [&self.gene, &self.url, &self.forward, &self.reverse]
    }
}

/// Project crawl records into 4-column rows, pairing primers two at a time
/// in encounter order. Records without primers contribute nothing; an odd
/// trailing primer gets an empty reverse field.
pub fn build_primer_rows(records: &[ArticleRecord], gene_label: &str) -> Vec<OutputRow> {
    let mut rows = Vec::new();
    for record in records {
        if record.primers.is_empty() {
            continue;
        }
        for pair in record.primers.chunks(2) {
            rows.push(OutputRow {
                gene: gene_label.to_string(),
                url: record.url.clone(),
                forward: pair[0].clone(),
                reverse: pair.get(1).cloned().unwrap_or_default(),
            });
        }
    }
    rows
}

/// First whitespace token of the query, used to tag the first column.
pub fn infer_gene_label(query: &str, fallback: &str) -> String {
    query
        .split_whitespace()
        .next()
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::article_url;

    fn record(pmcid: &str, primers: &[&str]) -> ArticleRecord {
        ArticleRecord {
            pmcid: pmcid.to_string(),
            url: article_url(pmcid),
            has_primers: !primers.is_empty(),
            primers: primers.iter().map(|p| p.to_string()).collect(),
            success_evidence: false,
        }
    }

    #[test]
    fn test_three_primers_make_two_rows() {
        let records = [record("PMC1", &["AAA", "CCC", "GGG"])];
        let rows = build_primer_rows(&records, "IL11");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].forward, "AAA");
        assert_eq!(rows[0].reverse, "CCC");
        assert_eq!(rows[1].forward, "GGG");
        assert_eq!(rows[1].reverse, "");
    }

    #[test]
    fn test_records_without_primers_are_skipped() {
        let records = [record("PMC1", &[]), record("PMC2", &["AAA", "CCC"])];
        let rows = build_primer_rows(&records, "IL11");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, article_url("PMC2"));
    }

    #[test]
    fn test_rows_carry_the_shared_gene_label() {
        let records = [record("PMC1", &["AAA"])];
        let rows = build_primer_rows(&records, "EGR1");
        assert_eq!(rows[0].gene, "EGR1");
        assert_eq!(rows[0].cells(), ["EGR1", rows[0].url.as_str(), "AAA", ""]);
    }

    #[test]
    fn test_gene_label_inference() {
        assert_eq!(infer_gene_label("EGR1 human primer", "IL11"), "EGR1");
        assert_eq!(infer_gene_label("   ", "IL11"), "IL11");
        assert_eq!(infer_gene_label("", "IL11"), "IL11");
    }
}

use regex::{Regex, RegexBuilder};

pub const DEFAULT_GENE: &str = "IL11";

/// Byte offsets of one gene mention in a text body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MentionSpan {
    pub start: usize,
    pub end: usize,
}

/// Compiled case-insensitive, word-bounded matcher for a gene name.
///
/// IL11 carries a hand-curated alias pattern (hyphenation-optional
/// abbreviation, or the spelled-out interleukin form with optional
/// space/hyphen before the number); every other gene is matched as an
/// escaped literal.
#[derive(Clone, Debug)]
pub struct GenePattern {
    regex: Regex,
}

impl GenePattern {
    pub fn compile(gene_name: &str) -> Self {
        let gene = gene_name.trim();
        let gene = if gene.is_empty() { DEFAULT_GENE } else { gene };
        let pattern = if gene.eq_ignore_ascii_case(DEFAULT_GENE) {
            r"\b(?:il-?11|interleukin[- ]?11)\b".to_string()
        } else {
            format!(r"\b{}\b", regex::escape(gene))
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("escaped gene literal is a valid pattern");
        Self { regex }
    }

    /// All mention spans, ascending by start, from one left-to-right scan.
    /// Matching runs over an ASCII-lowercased copy of the text; the copy is
    /// length-preserving, so the offsets stay valid for the original.
    pub fn find_mentions(&self, text: &str) -> Vec<MentionSpan> {
        let lower = text.to_ascii_lowercase();
        self.regex
            .find_iter(&lower)
            .map(|hit| MentionSpan {
                start: hit.start(),
                end: hit.end(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_il11_alias_forms() {
        let pattern = GenePattern::compile("IL11");
        for text in [
            "IL11 was assayed",
            "IL-11 was assayed",
            "Interleukin-11 was assayed",
            "interleukin 11 was assayed",
            "INTERLEUKIN11 was assayed",
        ] {
            assert_eq!(pattern.find_mentions(text).len(), 1, "no match in {text:?}");
        }
    }

    #[test]
    fn test_il11_respects_word_boundaries() {
        let pattern = GenePattern::compile("IL11");
        assert!(pattern.find_mentions("IL-110 was assayed").is_empty());
        assert!(pattern.find_mentions("XIL11 was assayed").is_empty());
    }

    #[test]
    fn test_other_gene_is_escaped_literal() {
        let pattern = GenePattern::compile("EGR1");
        assert_eq!(pattern.find_mentions("egr1 and EGR1 again").len(), 2);
        assert!(pattern.find_mentions("EGR12 only").is_empty());
    }

    #[test]
    fn test_empty_gene_falls_back_to_default() {
        let pattern = GenePattern::compile("   ");
        assert_eq!(pattern.find_mentions("IL-11 here").len(), 1);
    }

    #[test]
    fn test_spans_are_sorted_and_disjoint() {
        let pattern = GenePattern::compile("IL11");
        let spans = pattern.find_mentions("IL-11, then interleukin-11, then IL11.");
        assert_eq!(spans.len(), 3);
        for pair in spans.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_empty_text_yields_no_spans() {
        let pattern = GenePattern::compile("IL11");
        assert!(pattern.find_mentions("").is_empty());
    }
}

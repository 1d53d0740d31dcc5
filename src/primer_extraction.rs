//! Mention-anchored primer detection and expression-change evidence
//! classification over a flattened article body.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::gene_pattern::MentionSpan;

/// How far past a gene mention to look for primer sequences.
pub const PRIMER_SEARCH_SPAN: usize = 180;

/// Radius of the context window checked for expression-change language.
pub const SUCCESS_CONTEXT_WINDOW: usize = 160;

/// Expression-change vocabulary checked around each gene mention.
pub const SUCCESS_KEYWORDS: [&str; 17] = [
    "upregulated",
    "downregulated",
    "overexpressed",
    "overexpression",
    "suppressed",
    "suppression",
    "decreased",
    "increased",
    "elevated",
    "reduced",
    "knockdown",
    "silenced",
    "activation",
    "activated",
    "inhibited",
    "inhibition",
    "expression",
];

lazy_static! {
    static ref PRIMER_PATTERN: Regex =
        Regex::new("[ATCGatcg]{18,35}").expect("primer run pattern is valid");
}

/// Primer sequences that appear shortly after the given gene mentions.
///
/// Each mention window contributes at most two sequences (the expected
/// forward/reverse pair); the accumulated list is deduplicated preserving
/// first-seen order.
pub fn extract_gene_primers(text: &str, mentions: &[MentionSpan]) -> Vec<String> {
    if text.is_empty() || mentions.is_empty() {
        return Vec::new();
    }

    let mut primers: Vec<String> = Vec::new();
    for mention in mentions {
        let window_start = floor_char_boundary(text, mention.end);
        let window_end = floor_char_boundary(text, mention.end.saturating_add(PRIMER_SEARCH_SPAN));
        let window = &text[window_start..window_end];

        let mut found_for_mention = 0;
        for run in PRIMER_PATTERN.find_iter(window) {
            let cleaned: String = run
                .as_str()
                .chars()
                .map(|ch| ch.to_ascii_uppercase())
                .filter(|ch| matches!(ch, 'A' | 'C' | 'G' | 'T'))
                .collect();
            if !cleaned.is_empty() {
                primers.push(cleaned);
                found_for_mention += 1;
            }
            if found_for_mention >= 2 {
                break;
            }
        }
    }
    primers.into_iter().unique().collect()
}

/// True when any gene mention has expression-change language within its
/// surrounding context window. Short-circuits on the first hit.
pub fn has_gene_success_evidence(text: &str, mentions: &[MentionSpan]) -> bool {
    if text.is_empty() {
        return false;
    }

    let lower = text.to_ascii_lowercase();
    for mention in mentions {
        let window_start =
            floor_char_boundary(&lower, mention.start.saturating_sub(SUCCESS_CONTEXT_WINDOW));
        let window_end =
            floor_char_boundary(&lower, mention.end.saturating_add(SUCCESS_CONTEXT_WINDOW));
        let window = &lower[window_start..window_end];
        if SUCCESS_KEYWORDS.iter().any(|keyword| window.contains(keyword)) {
            return true;
        }
    }
    false
}

// Window edges are measured in bytes; pull them back onto a char boundary so
// slicing cannot panic on multi-byte text.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

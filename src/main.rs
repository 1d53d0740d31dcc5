use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use chrono::Local;
use primerseek::crawl::{self, CrawlConfig, DEFAULT_ARTICLE_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_QUERY};
use primerseek::eutils::PmcClient;
use primerseek::gene_pattern::DEFAULT_GENE;
use primerseek::output_path::resolve_output_path;
use primerseek::primer_rows::{build_primer_rows, infer_gene_label};
use primerseek::xlsx::write_xlsx_table;

const DEFAULT_EXCEL_PATH: &str = "primers.xlsx";
const EXCEL_HEADERS: [&str; 4] = ["Gene", "URL", "Primer 1", "Primer 2"];

fn usage() {
    eprintln!(
        "Find gene-specific primers in PubMed Central (default: IL11) and export results.\n\n\
         Usage:\n  \
         primerseek [OPTIONS] [QUERY WORDS...]\n\n\
         Options:\n  \
         -n, --article-limit N   Number of PMC articles to process (default: {DEFAULT_ARTICLE_LIMIT})\n  \
         --page N                Zero-based page of results to fetch\n  \
         --page-size N           Number of PMC IDs to request per page (default: {DEFAULT_PAGE_SIZE})\n  \
         -x, --excel PATH        Path for the Excel table (default: {DEFAULT_EXCEL_PATH})\n  \
         --overwrite             Allow overwriting the Excel file (otherwise a _1, _2 suffix is added)\n  \
         -g, --gene NAME         Gene label for the first Excel column (default: first query token)\n  \
         -t, --target-gene NAME  Gene name to search around in the article text (default: {DEFAULT_GENE})\n  \
         --skip-json             Suppress printing the raw JSON crawl data to stdout\n  \
         --version               Print the version and exit\n  \
         -h, --help              Show this help"
    );
}

struct CliArgs {
    query_words: Vec<String>,
    article_limit: usize,
    page: usize,
    page_size: usize,
    excel_path: String,
    overwrite: bool,
    gene: Option<String>,
    target_gene: Option<String>,
    skip_json: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            query_words: Vec::new(),
            article_limit: DEFAULT_ARTICLE_LIMIT,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            excel_path: DEFAULT_EXCEL_PATH.to_string(),
            overwrite: false,
            gene: None,
            target_gene: None,
            skip_json: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-n" | "--article-limit" => parsed.article_limit = next_integer(&mut iter, arg)?,
            "--page" => parsed.page = next_integer(&mut iter, arg)?,
            "--page-size" => parsed.page_size = next_integer(&mut iter, arg)?,
            "-x" | "--excel" => parsed.excel_path = next_value(&mut iter, arg)?,
            "--overwrite" => parsed.overwrite = true,
            "-g" | "--gene" => parsed.gene = Some(next_value(&mut iter, arg)?),
            "-t" | "--target-gene" => parsed.target_gene = Some(next_value(&mut iter, arg)?),
            "--skip-json" => parsed.skip_json = true,
            other if other.starts_with('-') => return Err(format!("Unknown option '{other}'")),
            word => parsed.query_words.push(word.to_string()),
        }
    }
    Ok(parsed)
}

fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("Option '{flag}' needs a value"))
}

fn next_integer(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<usize, String> {
    next_value(iter, flag)?
        .parse()
        .map_err(|_| format!("Option '{flag}' needs a non-negative integer value"))
}

/// Timestamped progress line on stderr; stdout stays reserved for data.
fn log(message: &str) {
    eprintln!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}

fn run(cli: CliArgs) -> Result<()> {
    let override_query = cli
        .query_words
        .iter()
        .map(|word| word.trim())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let query = if override_query.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        override_query
    };
    let target_gene = cli
        .target_gene
        .clone()
        .unwrap_or_else(|| infer_gene_label(&query, DEFAULT_GENE));
    let gene_label = cli.gene.clone().unwrap_or_else(|| target_gene.clone());

    let config = CrawlConfig {
        query,
        target_gene,
        gene_label: gene_label.clone(),
        article_limit: cli.article_limit,
        page: cli.page,
        page_size: cli.page_size,
    };
    let client = PmcClient::new()?;

    log("Starting crawl");
    let records = crawl::crawl(&config, &client, &mut |message| log(message));
    log(&format!("Completed crawl; {} records", records.len()));

    let rows = build_primer_rows(&records, &gene_label);
    if rows.is_empty() {
        log("No primer sequences found; Excel export skipped");
    } else {
        let target = resolve_output_path(Path::new(&cli.excel_path), cli.overwrite);
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.cells().iter().map(|cell| cell.to_string()).collect())
            .collect();
        let written = write_xlsx_table(&EXCEL_HEADERS, &cells, &target)?;
        log(&format!(
            "Wrote Excel table ({} row(s)) to {}",
            rows.len(),
            written.display()
        ));
    }

    if !cli.skip_json {
        let text = serde_json::to_string_pretty(&records)
            .map_err(|e| anyhow!("Could not serialize JSON output: {e}"))?;
        println!("{text}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        usage();
        return ExitCode::SUCCESS;
    }
    if args.iter().any(|arg| arg == "--version") {
        println!("primerseek {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}\n");
            usage();
            return ExitCode::FAILURE;
        }
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log(&format!("ERROR: {e}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_arguments() {
        let cli = parse_args(&[]).unwrap();
        assert!(cli.query_words.is_empty());
        assert_eq!(cli.article_limit, DEFAULT_ARTICLE_LIMIT);
        assert_eq!(cli.excel_path, DEFAULT_EXCEL_PATH);
        assert!(!cli.overwrite);
        assert!(!cli.skip_json);
    }

    #[test]
    fn test_query_words_and_options_mix() {
        let cli = parse_args(&args(&[
            "EGR1",
            "human",
            "primer",
            "-n",
            "25",
            "--page",
            "2",
            "--page-size",
            "50",
            "-x",
            "out.xlsx",
            "--overwrite",
            "-t",
            "EGR1",
            "--skip-json",
        ]))
        .unwrap();
        assert_eq!(cli.query_words, args(&["EGR1", "human", "primer"]));
        assert_eq!(cli.article_limit, 25);
        assert_eq!(cli.page, 2);
        assert_eq!(cli.page_size, 50);
        assert_eq!(cli.excel_path, "out.xlsx");
        assert!(cli.overwrite);
        assert_eq!(cli.target_gene.as_deref(), Some("EGR1"));
        assert!(cli.skip_json);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn test_option_missing_value_is_rejected() {
        assert!(parse_args(&args(&["--article-limit"])).is_err());
        assert!(parse_args(&args(&["-n", "many"])).is_err());
    }
}

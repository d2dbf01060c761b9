use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::json;

use qfind::{EntryKind, ScoreStrategy, SearchOutcome};

/// Command-line arguments accepted by the `qfind` binary.
#[derive(Parser, Debug)]
#[command(
    name = "qfind",
    version,
    about = "Fuzzy search over an indexed corpus of files"
)]
pub(crate) struct CliArgs {
    #[arg(
        value_name = "QUERY",
        help = "Query text, e.g. 'in:src/io reader' (default: empty)"
    )]
    pub(crate) query: Option<String>,
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "QFIND_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'r',
        long,
        value_name = "PATH",
        help = "Corpus root directory to index (default: current directory)"
    )]
    pub(crate) root: Option<PathBuf>,
    #[arg(
        short = 's',
        long,
        value_enum,
        help = "Scoring strategy (default: consecutive-run)"
    )]
    pub(crate) strategy: Option<StrategyArg>,
    #[arg(
        long,
        value_name = "BOOL",
        help = "Include hidden files in the corpus (default: from config)"
    )]
    pub(crate) hidden: Option<bool>,
    #[arg(
        long = "max-depth",
        value_name = "N",
        help = "Limit directory traversal depth (default: unlimited)"
    )]
    pub(crate) max_depth: Option<usize>,
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = OutputFormat::Plain,
        help = "Output format (default: plain)"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long = "print-config",
        help = "Print the effective configuration before searching"
    )]
    pub(crate) print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    ConsecutiveRun,
    EditDistance,
}

impl StrategyArg {
    pub(crate) fn as_strategy(self) -> ScoreStrategy {
        match self {
            Self::ConsecutiveRun => ScoreStrategy::ConsecutiveRun,
            Self::EditDistance => ScoreStrategy::EditDistance,
        }
    }
}

/// Parse command line arguments into the strongly typed [`CliArgs`] structure.
pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

/// Print a plain-text representation of the search outcome.
pub(crate) fn print_plain(query: &str, outcome: &SearchOutcome) {
    if outcome.index_unavailable {
        println!("index unavailable (query: '{query}')");
        return;
    }

    println!("{} results for '{query}'", outcome.total_count);
    for result in &outcome.delivered {
        println!("{:>6}  {}", result.priority, result.entry.path);
    }
}

/// Format the search outcome as a JSON string.
pub(crate) fn format_outcome_json(query: &str, outcome: &SearchOutcome) -> Result<String> {
    let results: Vec<_> = outcome
        .delivered
        .iter()
        .map(|result| {
            json!({
                "path": result.entry.path,
                "name": result.entry.display_name_with_extension,
                "kind": kind_label(result.entry.kind),
                "score": result.priority,
            })
        })
        .collect();

    let payload = json!({
        "query": query,
        "total": outcome.total_count,
        "index_unavailable": outcome.index_unavailable,
        "results": results,
    });

    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the search outcome.
pub(crate) fn print_json(query: &str, outcome: &SearchOutcome) -> Result<()> {
    println!("{}", format_outcome_json(query, outcome)?);
    Ok(())
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::PathEntry => "path",
        EntryKind::Command => "command",
        EntryKind::LiveObject => "object",
        EntryKind::TextMatch => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qfind::{Entry, EntryId, ScoredResult};
    use serde_json::Value;

    #[test]
    fn json_format_reports_totals_and_paths() {
        let outcome = SearchOutcome {
            total_count: 1,
            delivered: vec![ScoredResult {
                entry: Entry::path_entry(EntryId(1), "Assets/Foo/Player.cs", true),
                priority: 42,
            }],
            active_index: 0,
            index_unavailable: false,
        };

        let text = format_outcome_json("play", &outcome).expect("json");
        let value: Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["total"], 1);
        assert_eq!(value["results"][0]["path"], "Assets/Foo/Player.cs");
        assert_eq!(value["results"][0]["kind"], "path");
        assert_eq!(value["results"][0]["score"], 42);
    }
}

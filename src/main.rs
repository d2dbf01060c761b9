mod cli;
mod settings;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;

use qfind::cancel::CancelToken;
use qfind::{FilesystemCorpus, SearchCategory, SearchEngine, SearchOutcome};

fn main() -> Result<()> {
    env_logger::init();

    let cli = parse_cli();
    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    run_search(cli.query.as_deref().unwrap_or_default(), cli.output, resolved)
}

/// Index the corpus root, run one search session, and print the outcome.
fn run_search(query: &str, format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
    let corpus = FilesystemCorpus::with_options(settings.root, settings.walk);
    let engine = SearchEngine::new(corpus).with_strategy(settings.strategy);

    let token = CancelToken::detached();
    let outcome = engine
        .search(query, SearchCategory::Paths, &token)
        .unwrap_or_else(SearchOutcome::empty);

    match format {
        OutputFormat::Plain => print_plain(query, &outcome),
        OutputFormat::Json => print_json(query, &outcome)?,
    }

    Ok(())
}

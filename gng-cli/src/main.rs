use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use env_logger::Env;
use gng_core::corpus;
use log::{debug, info, warn};

mod cli;
mod config;
mod source;

use cli::Cli;
use source::TextSource;

fn main() -> Result<()> {
	let (cli, sources) = Cli::parse_ordered();
	init_logging(cli.verbose, cli.quiet);

	let settings = cli.overlay(config::load(cli.config.as_deref())?).clamped();
	debug!("{settings:?}");

	let (sources, weights) = resolve_sources(sources, cli.weights.clone(), io::stdin().is_terminal());
	if sources.is_empty() {
		bail!("no text was specified, use --file, --url, --text or --stdin");
	}

	let mut corpora = Vec::with_capacity(sources.len());
	for source in &sources {
		let lines = source.load().with_context(|| format!("failed to load {source}"))?;
		info!("loaded {} lines from {source}", lines.len());
		corpora.push(lines);
	}
	if weights.len() > corpora.len() {
		warn!("{} weight(s) without a matching source ignored", weights.len() - corpora.len());
	}

	// Combine all the texts, re-weighted if weights are given
	let lines = corpus::combine(&corpora, &weights);
	if lines.is_empty() {
		bail!("the specified text{} no line of text", if corpora.len() == 1 { " contains" } else { "s contain" });
	}

	let mut model = settings.build_model();
	model.train(&lines);
	if model.is_empty() {
		warn!("no line has at least {} words, nothing can be generated", settings.ngram);
	}
	info!("model ready: {} prefixes, {} starts", model.prefix_count(), model.start_count());

	let mut out = io::stdout().lock();
	for _ in 0..settings.count {
		let result = model.generate(settings.length, settings.retries);
		debug!("{} words, graceful = {}, tries = {}", result.words, result.graceful, result.tries);
		writeln!(out, "{}", result.text)?;
	}

	Ok(())
}

/// Decides which sources to read.
///
/// - Standard input on a terminal is skipped, with the weight at its position.
/// - Without any source, piped standard input is read.
fn resolve_sources(
	sources: Vec<TextSource>,
	mut weights: Vec<f64>,
	stdin_is_terminal: bool,
) -> (Vec<TextSource>, Vec<f64>) {
	if sources.is_empty() {
		let sources = if stdin_is_terminal { Vec::new() } else { vec![TextSource::Stdin] };
		return (sources, weights);
	}
	if !stdin_is_terminal {
		return (sources, weights);
	}

	let mut kept = Vec::with_capacity(sources.len());
	for source in sources {
		if source == TextSource::Stdin {
			warn!("standard input is a terminal, --stdin ignored");
			// weights left of this one were already realigned
			if kept.len() < weights.len() {
				weights.remove(kept.len());
			}
		} else {
			kept.push(source);
		}
	}
	(kept, weights)
}

/// Default level is `warn`; each `-v` raises it, each `-q` lowers it.
/// `RUST_LOG` takes precedence.
fn init_logging(verbose: u8, quiet: u8) {
	let level = match i16::from(verbose) - i16::from(quiet) {
		i16::MIN..=-2 => "off",
		-1 => "error",
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init();
}

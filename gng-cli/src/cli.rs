use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use gng_core::Settings;

use crate::source::TextSource;

/// Command-line arguments.
///
/// Generation flags left out keep the value of the configuration file, or
/// the default.
#[derive(Parser, Debug)]
#[command(name = "gng", author, version, about = "Generates lines of text with a guided n-gram model", long_about = None)]
pub struct Cli {
	/// Size of the n-grams [default: 3]
	#[arg(short = 'g', long, value_name = "N")]
	pub ngram: Option<usize>,

	/// Target number of words per line [default: 12]
	#[arg(short, long, value_name = "WORDS")]
	pub length: Option<usize>,

	/// Number of lines to generate [default: 1]
	#[arg(short, long, value_name = "LINES")]
	pub count: Option<usize>,

	/// Attempts per line to reach a natural ending [default: 100]
	#[arg(short, long, value_name = "TRIES")]
	pub retries: Option<usize>,

	/// Words past the target length after which an attempt is abandoned [default: 4096]
	#[arg(long, value_name = "WORDS")]
	pub word_limit: Option<usize>,

	/// Text file to learn from (repeatable)
	#[arg(short = 'f', long = "file", value_name = "PATH")]
	pub files: Vec<PathBuf>,

	/// URL of a plain-text resource to learn from (repeatable)
	#[arg(short = 'u', long = "url", value_name = "URL")]
	pub urls: Vec<String>,

	/// Literal text to learn from, one line per line (repeatable)
	#[arg(short = 't', long = "text", value_name = "TEXT")]
	pub texts: Vec<String>,

	/// Learn from standard input
	#[arg(long)]
	pub stdin: bool,

	/// Relative weight of the source at the same position (repeatable)
	#[arg(short = 'w', long = "weight", value_name = "WEIGHT", allow_negative_numbers = true)]
	pub weights: Vec<f64>,

	/// TOML configuration file [env: GNG_CONFIG]
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Increase verbosity (-v, -vv, -vvv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	pub verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	pub quiet: u8,
}

impl Cli {
	/// Parses the process arguments and the sources in command-line order.
	pub fn parse_ordered() -> (Self, Vec<TextSource>) {
		Self::try_parse_ordered_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
	}

	pub fn try_parse_ordered_from<I, T>(args: I) -> Result<(Self, Vec<TextSource>), clap::Error>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let matches = Self::command().try_get_matches_from(args)?;
		let cli = Self::from_arg_matches(&matches)?;
		let sources = cli.ordered_sources(&matches);
		Ok((cli, sources))
	}

	/// Sources sorted by their position on the command line, so that the
	/// n-th `--weight` applies to the n-th source whatever its kind.
	fn ordered_sources(&self, matches: &ArgMatches) -> Vec<TextSource> {
		let mut indexed: Vec<(usize, TextSource)> = Vec::new();

		let positions = |id: &str| matches.indices_of(id).into_iter().flatten();
		indexed.extend(positions("files").zip(&self.files).map(|(i, path)| (i, TextSource::File(path.clone()))));
		indexed.extend(positions("urls").zip(&self.urls).map(|(i, url)| (i, TextSource::Url(url.clone()))));
		indexed.extend(positions("texts").zip(&self.texts).map(|(i, text)| (i, TextSource::Text(text.clone()))));
		if self.stdin {
			indexed.extend(matches.index_of("stdin").map(|i| (i, TextSource::Stdin)));
		}

		indexed.sort_by_key(|(i, _)| *i);
		indexed.into_iter().map(|(_, source)| source).collect()
	}

	/// Applies the flags given on the command line over `settings`.
	pub fn overlay(&self, mut settings: Settings) -> Settings {
		if let Some(ngram) = self.ngram {
			settings.ngram = ngram;
		}
		if let Some(length) = self.length {
			settings.length = length;
		}
		if let Some(count) = self.count {
			settings.count = count;
		}
		if let Some(retries) = self.retries {
			settings.retries = retries;
		}
		if let Some(word_limit) = self.word_limit {
			settings.word_limit = word_limit;
		}
		settings
	}
}

use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use gng_core::io::{read_file, read_lines};
use reqwest::blocking::Client;
use thiserror::Error;

/// Timeout applied to URL sources.
const FETCH_TIMEOUT: Duration = Duration::new(5, 0);

/// Where a corpus comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
	/// A text file, one line per line.
	File(PathBuf),
	/// A plain-text resource fetched over HTTP(S).
	Url(String),
	/// Literal text given on the command line, split on newlines.
	Text(String),
	/// Standard input, read to the end.
	Stdin,
}

#[derive(Debug, Error)]
pub enum SourceError {
	#[error("failed to read {}: {source}", path.display())]
	File { path: PathBuf, source: io::Error },

	#[error("failed to fetch {url}: {source}")]
	Http { url: String, source: reqwest::Error },

	#[error("failed to read standard input: {0}")]
	Stdin(#[source] io::Error),

	#[error("no text was specified on standard input")]
	EmptyStdin,
}

impl TextSource {
	/// Loads every line of the source.
	///
	/// Either all lines are returned or an error; never a partial corpus.
	pub fn load(&self) -> Result<Vec<String>, SourceError> {
		match self {
			TextSource::File(path) => {
				read_file(path).map_err(|source| SourceError::File { path: path.clone(), source })
			}
			TextSource::Url(url) => {
				fetch(url).map_err(|source| SourceError::Http { url: url.clone(), source })
			}
			TextSource::Text(text) => Ok(text.lines().map(str::to_owned).collect()),
			TextSource::Stdin => read_stdin(io::stdin().lock()),
		}
	}
}

/// Reads piped input; input with only blank lines counts as no input.
fn read_stdin<R: Read>(reader: R) -> Result<Vec<String>, SourceError> {
	let lines = read_lines(reader).map_err(SourceError::Stdin)?;
	if lines.iter().all(|line| line.trim().is_empty()) {
		return Err(SourceError::EmptyStdin);
	}
	Ok(lines)
}

fn fetch(url: &str) -> reqwest::Result<Vec<String>> {
	let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
	let body = client.get(url).send()?.error_for_status()?.text()?;
	Ok(body.lines().map(str::to_owned).collect())
}

impl fmt::Display for TextSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TextSource::File(path) => write!(f, "file {}", path.display()),
			TextSource::Url(url) => write!(f, "url {url}"),
			TextSource::Text(_) => write!(f, "literal text"),
			TextSource::Stdin => write!(f, "standard input"),
		}
	}
}

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Reads every line from a reader.
///
/// - Splits on `\n` / `\r\n`
/// - Fails as a whole: no partial result on a read error
pub fn read_lines<R: Read>(reader: R) -> io::Result<Vec<String>> {
	BufReader::new(reader).lines().collect()
}

/// Reads a text file and returns all its lines as a `Vec<String>`.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	read_lines(File::open(filename)?)
}

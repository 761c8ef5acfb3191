use lazy_static::lazy_static;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till1},
    character::complete::{anychar, char, multispace0},
    combinator::{all_consuming, recognize},
    multi::many0,
    sequence::{delimited, pair, separated_pair, terminated},
    IResult,
};
use regex::Regex;
use std::{
    borrow::Cow,
    io::{self, BufRead},
    num::ParseIntError,
};
use thiserror::Error;
use tracing::{debug, trace, warn};
use transgen_types::table::{ArrayName, ArrayTable, Entry};

/// An entry line whose key is not an `i32`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entry key `{key}` is not a valid i32")]
pub struct MalformedEntryError {
    pub key: String,
    pub source: ParseIntError,
}

/// Shape of one trimmed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `'<name>' =>` with nothing after the arrow
    Opener(ArrayName),
    /// `<key> => '<value>'`, anything after the closing quote ignored
    Entry(Entry),
    MalformedEntry(MalformedEntryError),
    Other,
}

fn fat_arrow(input: &str) -> IResult<&str, &str> {
    delimited(multispace0, tag("=>"), multispace0)(input)
}

fn quoted_name(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), is_not("'"), char('\''))(input)
}

// A backslash always takes the following char with it, so `\'` and `\\`
// never close the literal.
fn quoted_value(input: &str) -> IResult<&str, &str> {
    delimited(
        char('\''),
        recognize(many0(alt((
            is_not("\\'"),
            recognize(pair(char('\\'), anychar)),
        )))),
        char('\''),
    )(input)
}

fn entry_key(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '=')(input)
}

fn parse_opener(input: &str) -> IResult<&str, &str> {
    all_consuming(terminated(quoted_name, fat_arrow))(input)
}

fn parse_entry(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(entry_key, fat_arrow, quoted_value)(input)
}

pub fn classify_line(line: &str) -> Line {
    let line = line.trim();
    if let Ok((_, name)) = parse_opener(line) {
        return Line::Opener(name.into());
    }
    match parse_entry(line) {
        Ok((_, (key, raw_value))) => match key.parse::<i32>() {
            Ok(key) => Line::Entry(Entry::new(key, unescape_single_quoted(raw_value))),
            Err(source) => Line::MalformedEntry(MalformedEntryError {
                key: key.to_owned(),
                source,
            }),
        },
        Err(_) => Line::Other,
    }
}

/// Decodes the body of a single-quoted PHP literal.
///
/// Only `\'` and `\\` are escapes; any other backslash is kept as is.
pub fn unescape_single_quoted(raw: &str) -> Cow<'_, str> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"\\([\\'])").unwrap();
    }
    RE.replace_all(raw, "$1")
}

/// Inverse of [`unescape_single_quoted`].
pub fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', r"\\").replace('\'', r"\'")
}

#[derive(Debug)]
struct OpenArray {
    name: ArrayName,
    entries: Vec<Entry>,
}

/// Line-by-line accumulator behind [`extract`].
///
/// An array is only committed when the next opener arrives or the input ends,
/// and only if it collected at least one entry.
#[derive(Debug, Default)]
pub struct Extractor {
    table: ArrayTable,
    open: Option<OpenArray>,
    line_no: usize,
    skipped: usize,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) {
        self.line_no += 1;
        match classify_line(line) {
            Line::Opener(name) => {
                self.commit_open();
                self.open = Some(OpenArray {
                    name,
                    entries: Vec::new(),
                });
            }
            Line::Entry(entry) => match &mut self.open {
                Some(open) => open.entries.push(entry),
                None => trace!(line = self.line_no, "entry outside of any array"),
            },
            Line::MalformedEntry(err) => {
                if let Some(open) = &self.open {
                    warn!(
                        line = self.line_no,
                        array = %open.name,
                        reason = %err.source,
                        "skipping entry: {err}"
                    );
                    self.skipped += 1;
                }
            }
            Line::Other => {}
        }
    }

    /// Number of malformed entry lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(mut self) -> ArrayTable {
        self.commit_open();
        debug!(
            arrays = self.table.len(),
            entries = self.table.entry_count(),
            skipped = self.skipped,
            "extraction finished"
        );
        self.table
    }

    fn commit_open(&mut self) {
        let Some(OpenArray { name, entries }) = self.open.take() else {
            return;
        };
        if entries.is_empty() {
            debug!(array = %name, "dropping empty array");
            return;
        }
        debug!(array = %name, entries = entries.len(), "committing array");
        if self.table.commit(name.clone(), entries).is_some() {
            debug!(array = %name, "array seen again, earlier entries replaced");
        }
    }
}

pub fn extract(text: &str) -> ArrayTable {
    text.lines()
        .fold(Extractor::new(), |mut extractor, line| {
            extractor.feed(line);
            extractor
        })
        .finish()
}

pub fn extract_reader(input: impl BufRead) -> io::Result<ArrayTable> {
    let mut extractor = Extractor::new();
    for line in input.lines() {
        extractor.feed(&line?);
    }
    Ok(extractor.finish())
}

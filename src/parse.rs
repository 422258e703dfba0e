//! Parsing utilities for response head lines.
use std::sync::LazyLock;

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::space0,
    combinator::{all_consuming, map, rest},
    sequence::separated_pair,
};
use regex::Regex;

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^HTTP/([0-9]+)\.([0-9]+) (.+)$").expect("status line pattern")
});

pub struct StatusLineRef<'a> {
    pub major: &'a str,
    pub minor: &'a str,
    pub phrase: &'a str,
}

/// Matches `HTTP/<digits>.<digits> <phrase>` against an already trimmed line.
///
/// On mismatch, returns the number of groups that matched.
pub fn status_line(line: &str) -> Result<StatusLineRef<'_>, usize> {
    let captures = STATUS_LINE.captures(line).ok_or(0usize)?;
    let count = captures.iter().flatten().count();

    match (captures.get(1), captures.get(2), captures.get(3)) {
        (Some(major), Some(minor), Some(phrase)) => Ok(StatusLineRef {
            major: major.as_str(),
            minor: minor.as_str(),
            phrase: phrase.as_str(),
        }),
        _ => Err(count),
    }
}

pub struct FieldPairRef<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Matches `<name>:<optional whitespace><value>` against an already trimmed
/// line. The value may be empty.
pub fn field_pair(line: &str) -> Option<FieldPairRef<'_>> {
    match all_consuming(field_pair_impl).parse(line) {
        Ok((_remain, pair)) => Some(pair),
        Err(_) => None,
    }
}

fn field_pair_impl(input: &str) -> IResult<&str, FieldPairRef<'_>> {
    let value = (space0, field_value);
    let pair = separated_pair(field_name, tag(":"), value);

    map(pair, |(name, (_space, value))| FieldPairRef { name, value }).parse(input)
}

fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ':' && !c.is_whitespace()).parse(input)
}

fn field_value(input: &str) -> IResult<&str, &str> {
    rest(input)
}

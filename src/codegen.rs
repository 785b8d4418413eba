//! Rewrites variable references into relative pointer moves.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::assignment::VariableMap;
use crate::errors::{HeaderError, HeaderResult};
use crate::scanner::{is_operator, sanitize, Class, Scanner};

/// Opens the header line. Since the line is `[...]` at the very start of the
/// program, it runs as a loop that is skipped on a fresh tape.
pub const HEADER_TAG: &str = "#vbf[";

pub fn encode_header(map: &VariableMap) -> String {
    format!("{}{}]\n", HEADER_TAG, map)
}

// Move from one location to another
fn push_move(program: &mut String, from: usize, to: usize) {
    match to.cmp(&from) {
        Ordering::Greater => program.push_str(&">".repeat(to - from)),
        Ordering::Less => program.push_str(&"<".repeat(from - to)),
        Ordering::Equal => {}
    }
}

/// Generates the target program for one complete assignment.
///
/// Every variable in code becomes the moves from the current cursor to its
/// location. Comments are kept with their operators sanitized, everything
/// else passes through unchanged. The header line is prepended.
pub fn generate(source: &str, map: &VariableMap) -> String {
    let mut program = encode_header(map);
    let mut cursor = 0;

    for (c, class) in Scanner::new(source) {
        match class {
            Class::Code => match map.get(c) {
                Some(location) => {
                    push_move(&mut program, cursor, location);
                    cursor = location;
                }
                None => program.push(c),
            },
            Class::CommentStart => program.push(c),
            Class::Comment => program.push(sanitize(c)),
        }
    }

    program
}

/// Recovers the assignment from the header line of a generated program.
pub fn decode_header(program: &str) -> HeaderResult<VariableMap> {
    let line = program.split('\n').next().unwrap_or_default();
    if !line.starts_with(HEADER_TAG) {
        return Err(HeaderError::Missing);
    }
    let pairs = line[HEADER_TAG.len()..]
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix("}]"))
        .ok_or_else(|| HeaderError::Malformed(line.to_string()))?;
    decode_pairs(pairs).map(VariableMap::from_locations)
}

fn expect_char(chars: &mut Peekable<Chars<'_>>, want: char) -> HeaderResult<()> {
    match chars.next() {
        Some(c) if c == want => Ok(()),
        Some(c) => Err(HeaderError::Malformed(format!(
            "expected {:?}, found {:?}",
            want, c
        ))),
        None => Err(HeaderError::Malformed(format!(
            "expected {:?}, found end of header",
            want
        ))),
    }
}

fn decode_pairs(pairs: &str) -> HeaderResult<Vec<char>> {
    let mut symbols: Vec<char> = Vec::new();
    let mut chars = pairs.chars().peekable();

    while chars.peek().is_some() {
        if !symbols.is_empty() {
            expect_char(&mut chars, ',')?;
            expect_char(&mut chars, ' ')?;
        }
        expect_char(&mut chars, '\'')?;
        let symbol = match chars.next() {
            Some('\\') => chars.next(),
            other => other,
        }
        .ok_or_else(|| HeaderError::Malformed("truncated symbol".to_string()))?;
        expect_char(&mut chars, '\'')?;
        expect_char(&mut chars, ':')?;
        expect_char(&mut chars, ' ')?;

        let digits: String = std::iter::from_fn(|| chars.next_if(char::is_ascii_digit)).collect();
        let location: usize = digits
            .parse()
            .map_err(|_| HeaderError::Malformed(format!("bad location for {:?}", symbol)))?;

        if location != symbols.len() {
            return Err(HeaderError::Malformed(format!(
                "{:?} is at location {}, expected {}",
                symbol,
                location,
                symbols.len()
            )));
        }
        if symbols.contains(&symbol) {
            return Err(HeaderError::Malformed(format!("{:?} listed twice", symbol)));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Follows the pointer moves of a generated program and reports the cursor
/// position at every other instruction. The header and comments are skipped.
pub fn replay(program: &str) -> Vec<(char, isize)> {
    let body = match program.strip_prefix(HEADER_TAG) {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
        None => program,
    };

    let mut cursor: isize = 0;
    let mut trace = Vec::new();
    for (c, class) in Scanner::new(body) {
        match (c, class) {
            ('>', Class::Code) => cursor += 1,
            ('<', Class::Code) => cursor -= 1,
            (c, Class::Code) if is_operator(c) => trace.push((c, cursor)),
            _ => {}
        }
    }
    trace
}

//! Parsing the list of requested character codes.

use std::collections::HashSet;

use crate::Error;

/// Expands a comma separated list of codes and inclusive ranges.
///
/// `"65,66-70,75"` requests `A`, `B` through `F` and `K`. Whitespace is
/// ignored anywhere in the input. Numbers written with a `0x` prefix or a
/// leading zero (`0x41`, `041`) are hexadecimal, all others are decimal.
///
/// The result keeps the order of the input with repeated codes removed.
pub fn parse_codes(input: &str) -> Result<Vec<u32>, Error> {
    let input: String = input.split_whitespace().collect();
    let mut codes = Vec::new();
    let mut seen = HashSet::new();
    for token in input.split(',') {
        match token.split('-').collect::<Vec<_>>().as_slice() {
            [code] => {
                let code = parse_code(code)?;
                if seen.insert(code) {
                    codes.push(code);
                }
            }
            [start, end] => {
                let start = parse_code(start)?;
                let end = parse_code(end)?;
                if start > end {
                    return Err(Error::InvalidCharacterRange { start, end });
                }
                codes.extend((start..=end).filter(|code| seen.insert(*code)));
            }
            _ => return Err(Error::InvalidCharacter(token.to_owned())),
        }
    }
    if codes.is_empty() {
        return Err(Error::EmptyCharacterList);
    }
    Ok(codes)
}

fn parse_code(raw: &str) -> Result<u32, Error> {
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if raw.len() > 1 && raw.starts_with('0') {
        u32::from_str_radix(raw, 16)
    } else {
        raw.parse()
    };
    // from_str_radix accepts a leading '+'
    match parsed {
        Ok(code) if !raw.contains('+') => Ok(code),
        _ => Err(Error::InvalidCharacter(raw.to_owned())),
    }
}

//! Text line protocol spoken by the tilt sensor firmware.
//!
//! Lines look like `Tilting up 30` or `Tilting right 12`, possibly wrapped in
//! other text. Up and left are negative, down and right positive.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AngleEvent {
    Pitch(f32),
    Roll(f32),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line carries no tilt keyword")]
    NoMatch,
    #[error("`{keyword}` without a magnitude")]
    MissingMagnitude { keyword: &'static str },
    #[error("magnitude `{digits}` out of range")]
    InvalidMagnitude { digits: String },
}

#[derive(Clone, Copy)]
enum Axis {
    Pitch,
    Roll,
}

// Checked in order; the first keyword present wins.
const KEYWORDS: [(&str, Axis, f32); 4] = [
    ("Tilting up", Axis::Pitch, -1.0),
    ("Tilting down", Axis::Pitch, 1.0),
    ("Tilting left", Axis::Roll, -1.0),
    ("Tilting right", Axis::Roll, 1.0),
];

pub fn parse_line(line: &str) -> Result<AngleEvent, ParseError> {
    let (keyword, axis, sign, rest) = KEYWORDS
        .iter()
        .find_map(|&(kw, axis, sign)| line.find(kw).map(|at| (kw, axis, sign, &line[at + kw.len()..])))
        .ok_or(ParseError::NoMatch)?;

    let digits = first_digit_run(rest).ok_or(ParseError::MissingMagnitude { keyword })?;
    let magnitude: u32 = digits.parse().map_err(|_| ParseError::InvalidMagnitude {
        digits: digits.to_string(),
    })?;
    let angle = sign * magnitude as f32;
    Ok(match axis {
        Axis::Pitch => AngleEvent::Pitch(angle),
        Axis::Roll => AngleEvent::Roll(angle),
    })
}

fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let tail = &s[start..];
    let len = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    Some(&tail[..len])
}

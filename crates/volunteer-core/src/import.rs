//! Bulk importer: delimited text lines to volunteer candidates
//!
//! Each line is `firstName,lastName,email[,...]`. Lines with fewer than three
//! fields or a blank email are dropped; one bad line never fails the batch.

use tracing::debug;

/// A well-formed line, not yet checked against the stored volunteers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Parse one line, `None` when it is malformed
pub fn parse_line(line: &str) -> Option<VolunteerCandidate> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return None;
    }

    let email = fields[2];
    if email.is_empty() {
        return None;
    }

    Some(VolunteerCandidate {
        first_name: fields[0].to_string(),
        last_name: fields[1].to_string(),
        email: email.to_string(),
    })
}

/// Parse a batch of lines, keeping input order
pub fn parse_lines<I, S>(lines: I) -> Vec<VolunteerCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.as_ref();
            let candidate = parse_line(line);
            if candidate.is_none() && !line.trim().is_empty() {
                debug!("Skipping malformed import line {}: {:?}", index + 1, line);
            }
            candidate
        })
        .collect()
}

/// Split an uploaded file into text lines. Handles CRLF and a UTF-8 BOM.
/// A line that is not valid UTF-8 is dropped on its own; the rest survive.
pub fn decode_lines(bytes: &[u8]) -> Vec<&str> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    if bytes.is_empty() {
        return Vec::new();
    }

    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(index, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            match std::str::from_utf8(raw) {
                Ok(line) => Some(line),
                Err(_) => {
                    debug!("Skipping non UTF-8 import line {}", index + 1);
                    None
                }
            }
        })
        .collect()
}

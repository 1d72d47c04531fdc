use serde::{Deserialize, Serialize};
use std::fmt;

/// A mapped record value. Absent values are represented as `None` by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Number(f64),
    Text(String),
}

impl RecordValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::Number(n) => Some(*n),
            RecordValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Number(_) => None,
            RecordValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Number(n) => write!(f, "{n}"),
            RecordValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parse `text` as a number written with `separator` as the decimal mark.
///
/// Whitespace is ignored. With a non-`.` separator the other mark (`.` for
/// `,`, otherwise `,`) is treated as thousands grouping and dropped. With `.`
/// only commas that group exactly three digits are dropped. Returns `None`
/// for blank, unparsable or non-finite input.
#[must_use]
pub fn parse_number(text: &str, separator: char) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = if separator == '.' {
        strip_grouping_commas(&compact)
    } else {
        let grouping = if separator == ',' { '.' } else { ',' };
        compact
            .chars()
            .filter(|&c| c != grouping)
            .map(|c| if c == separator { '.' } else { c })
            .collect()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Drops commas followed by exactly three digits and then the end of the
/// string or another `.`/`,`.
fn strip_grouping_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (index, &c) in chars.iter().enumerate() {
        if c == ',' && groups_three_digits(&chars[index + 1..]) {
            continue;
        }
        out.push(c);
    }
    out
}

fn groups_three_digits(rest: &[char]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(char::is_ascii_digit)
        && matches!(rest.get(3), None | Some('.' | ','))
}

/// Matches `YYYY-MM` period labels, which count as data in header detection.
#[must_use]
pub fn is_year_month(text: &str) -> bool {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^\d{4}-\d{2}$").expect("valid year-month regex"))
        .is_match(text.trim())
}

//! Stateless token finders for a single line of statement text.

use regex::Regex;

/// `01/03/2024`, `1-3-24`
pub const NUMERIC_DATE: &str = r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b";
/// `2024-03-01`, `2024/3/1`
pub const ISO_DATE: &str = r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b";
/// `Mar 1, 2024`, `January 15 2024`
pub const MONTH_FIRST_DATE: &str =
    r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}\b";
/// `1 March 2024`, `01 Mar. 2024`
pub const DAY_FIRST_DATE: &str =
    r"(?i)\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4}\b";
/// `01 Mar` (year comes from the statement period)
pub const DAY_MONTH_DATE: &str =
    r"(?i)\b\d{2}\s(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\b";

/// Most specific first; the first pattern with a hit decides the line's date.
pub const GENERIC_DATE_PATTERNS: [&str; 4] =
    [NUMERIC_DATE, ISO_DATE, MONTH_FIRST_DATE, DAY_FIRST_DATE];

/// Signed, optionally currency-prefixed decimal with two fraction digits.
/// The numeric part (sign and symbol included) is captured as `amount`.
pub const GENERIC_AMOUNT: &str = r"(?P<amount>(?:-\s?)?(?:(?:S\$|US\$|[$£€])\s?)?-?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})\b";

/// `Month YYYY` anywhere in a header, used to infer the statement period.
pub const STATEMENT_PERIOD: &str =
    r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{4})\b";

/// One amount-pattern hit on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken<'a> {
    /// Whole match, removed from the description
    pub matched: &'a str,
    /// The `amount` capture, or the whole match when the pattern has none
    pub value: &'a str,
    /// The `tag` capture (e.g. `DB`/`CR`) when the pattern declares one
    pub tag: Option<&'a str>,
}

/// All hits of the first pattern (in priority order) that matches the line at all.
pub fn find_dates<'a>(line: &'a str, patterns: &[Regex]) -> Vec<&'a str> {
    patterns
        .iter()
        .map(|pattern| pattern.find_iter(line).map(|m| m.as_str()).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Amount hits in encounter order.
pub fn find_amounts<'a>(line: &'a str, pattern: &Regex) -> Vec<AmountToken<'a>> {
    pattern
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.name("amount").unwrap_or(whole);
            Some(AmountToken {
                matched: whole.as_str(),
                value: value.as_str(),
                tag: caps.name("tag").map(|m| m.as_str()),
            })
        })
        .collect()
}

/// Removes every match of every pattern, then collapses whitespace runs and trims.
pub fn strip_all<'p>(line: &str, patterns: impl IntoIterator<Item = &'p Regex>) -> String {
    let mut text = line.to_string();
    for pattern in patterns {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

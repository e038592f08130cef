//! Layout profiles shipped with the crate.
//!
//! Bank profiles come first so that an issuer registration number wins over a
//! currency keyword that the same statement also mentions.

use rust_decimal::Decimal;

use super::dto::ProfileSpec;
use crate::parsers::tokenizer::{
    DAY_FIRST_DATE, DAY_MONTH_DATE, GENERIC_AMOUNT, GENERIC_DATE_PATTERNS, ISO_DATE,
    MONTH_FIRST_DATE, NUMERIC_DATE, STATEMENT_PERIOD,
};

pub const DEFAULT_PROFILE_NAME: &str = "default";

const SINGAPORE_NOISE: &str = r"(?i)\b(?:SINGAPORE|SG)\b";

/// Amounts above this on a generic layout usually mean a balance or reference
/// number was picked up instead of the transaction amount.
const GENERIC_REVIEW_THRESHOLD: i64 = 50_000;

pub fn dbs() -> ProfileSpec {
    ProfileSpec::new(
        "DBS",
        &[DAY_MONTH_DATE],
        r"(?P<amount>\d[\d,]*\.\d{2})\s+(?P<tag>DB|CR)\b",
        &["%d %b"],
        "SGD",
    )
    .bank("196800306E", r"([A-Z][a-z]+)(\d{4})", STATEMENT_PERIOD)
    .noise_pattern(SINGAPORE_NOISE)
}

pub fn citi() -> ProfileSpec {
    ProfileSpec::new(
        "Citi",
        &[DAY_MONTH_DATE],
        r"(?P<amount>\d[\d,]*\.\d{2})(?:\s*(?P<tag>CR))?\b",
        &["%d %b"],
        "SGD",
    )
    .bank("200309485K", r"_([A-Z][a-z]{2})(\d{4})_", STATEMENT_PERIOD)
    .noise_pattern(SINGAPORE_NOISE)
}

pub fn singapore_generic() -> ProfileSpec {
    ProfileSpec::new(
        "Singapore-generic",
        &GENERIC_DATE_PATTERNS,
        GENERIC_AMOUNT,
        &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y-%m-%d", "%d %b %Y", "%b %d, %Y"],
        "SGD",
    )
    .detection_token("singapore dollar")
    .noise_pattern(SINGAPORE_NOISE)
    .review_threshold(Decimal::from(GENERIC_REVIEW_THRESHOLD))
}

pub fn us_generic() -> ProfileSpec {
    ProfileSpec::new(
        "US-generic",
        &[NUMERIC_DATE, ISO_DATE, MONTH_FIRST_DATE, DAY_FIRST_DATE],
        GENERIC_AMOUNT,
        &["%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%Y-%m-%d", "%b %d, %Y", "%d %b %Y"],
        "USD",
    )
    .detection_token("usd")
    .review_threshold(Decimal::from(GENERIC_REVIEW_THRESHOLD))
}

pub fn uk_generic() -> ProfileSpec {
    ProfileSpec::new(
        "UK-generic",
        &[NUMERIC_DATE, ISO_DATE, DAY_FIRST_DATE, MONTH_FIRST_DATE],
        GENERIC_AMOUNT,
        &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y-%m-%d", "%d %b %Y", "%b %d, %Y"],
        "GBP",
    )
    .detection_token("gbp")
    .review_threshold(Decimal::from(GENERIC_REVIEW_THRESHOLD))
}

/// Fallback when no token matches: day-first numeric dates, generic amounts, SGD.
///
/// Month-first numeric dates are not declared; the permissive fallback reads
/// them only once day-first parsing has failed.
pub fn default_profile() -> ProfileSpec {
    ProfileSpec::new(
        DEFAULT_PROFILE_NAME,
        &GENERIC_DATE_PATTERNS,
        GENERIC_AMOUNT,
        &[
            "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y/%m/%d", "%Y-%m-%d", "%B %d, %Y", "%d %B %Y",
            "%b %d, %Y", "%d %b %Y",
        ],
        "SGD",
    )
    .review_threshold(Decimal::from(GENERIC_REVIEW_THRESHOLD))
}

/// Registration order used by [`FormatRegistry::builtin`](super::registry::FormatRegistry::builtin).
pub fn builtin_specs() -> Vec<ProfileSpec> {
    vec![dbs(), citi(), singapore_generic(), us_generic(), uk_generic()]
}

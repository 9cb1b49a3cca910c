use crate::error::DatevError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a trailing Soll/Haben marker affects the sign of an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// `S`/`H` suffixes are dropped without changing the sign.
    #[default]
    Plain,
    /// `S` (Soll) stays positive, `H` (Haben) turns the value negative.
    SollHaben,
}

/// Parse a German-formatted amount from a report cell.
///
/// Handles formats like:
/// - "1.234,56" -> 1234.56
/// - "-500,00", "500,00-", "(500,00)" -> -500.00
/// - "1.234,56 H" -> -1234.56 under `SignConvention::SollHaben`
/// - "12,5%" -> 12.5
/// - "-", "—", "" or any token without a digit -> None
///
/// The locale is fixed: `.` groups thousands, `,` separates decimals. Values
/// are rounded half away from zero to two decimals, the precision the writers
/// carry, so `format_amount` never loses anything.
pub fn parse_amount(s: &str, sign: SignConvention) -> Result<Option<Decimal>, DatevError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

    if !compact.chars().any(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let mut body = compact.as_str();
    let mut negative = false;

    if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        negative = true;
        body = inner;
    }

    if let Some(rest) = body.strip_suffix('H') {
        if sign == SignConvention::SollHaben {
            negative = true;
        }
        body = rest;
    } else if let Some(rest) = body.strip_suffix('S') {
        body = rest;
    }

    if let Some(rest) = body.strip_suffix('%') {
        body = rest;
    }

    if let Some(rest) = body.strip_suffix(['-', '\u{2212}']) {
        negative = true;
        body = rest;
    } else if let Some(rest) = body.strip_prefix(['-', '\u{2212}']) {
        negative = true;
        body = rest;
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest;
    }

    let value = parse_decimal(body)
        .ok_or_else(|| DatevError::InvalidNumber(s.trim().into()))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(Some(if negative { -value } else { value }))
}

/// Digits with `.` thousands grouping and at most one `,` decimal separator.
fn parse_decimal(body: &str) -> Option<Decimal> {
    if body.is_empty()
        || !body.starts_with(|c: char| c.is_ascii_digit())
        || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        || body.matches(',').count() > 1
    {
        return None;
    }

    let (int_part, frac_part) = match body.split_once(',') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    if frac_part.is_some_and(|f| f.is_empty() || f.contains('.')) {
        return None;
    }

    if int_part.contains('.') && !is_grouped(int_part) {
        return None;
    }

    let mut normalized: String = int_part.chars().filter(|c| *c != '.').collect();
    if let Some(frac) = frac_part {
        normalized.push('.');
        normalized.push_str(frac);
    }
    Decimal::from_str(&normalized).ok()
}

/// `1.234.567`: one to three leading digits, then groups of exactly three.
fn is_grouped(int_part: &str) -> bool {
    let mut groups = int_part.split('.');
    let lead_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
    lead_ok && groups.all(|g| g.len() == 3)
}

/// Format an amount the way the CSV output carries it: two decimals,
/// comma separator, no thousands grouping (e.g. `-1234,56`).
pub fn format_amount(value: Decimal) -> String {
    let mut v = value;
    v.rescale(2);
    if v.is_zero() {
        v.set_sign_positive(true);
    }
    v.to_string().replace('.', ",")
}

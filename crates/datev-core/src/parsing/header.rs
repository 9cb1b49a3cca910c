use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Jan(?:uar)?|Feb(?:ruar)?|M(?:ärz?|aerz?|rz|ar)|Apr(?:il)?|Mai|Jun(?:i)?|Jul(?:i)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Okt(?:ober)?|Nov(?:ember)?|Dez(?:ember)?)\.?\s*(?:[/.\-]\s*|\s+)\d{2,4}\b",
    )
    .expect("month pattern is valid")
});

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([/.\-])\s*").expect("separator pattern is valid"));

/// Detect the period labels of a development overview page.
///
/// Prefers the header line that carries `Bezeichnung`; falls back to the whole
/// page text. Returns the last `count` distinct month tokens (e.g. `Sep/2024`,
/// `März 24`), or `None` if fewer are printed.
pub fn detect_period_labels(page_text: &str, count: usize) -> Option<Vec<String>> {
    if count == 0 {
        return None;
    }

    let from_header = page_text
        .lines()
        .filter(|line| line.contains("Bezeichnung"))
        .map(month_tokens)
        .find(|tokens| tokens.len() >= count);

    let tokens = match from_header {
        Some(tokens) => tokens,
        None => {
            let tokens = month_tokens(page_text);
            if tokens.len() < count {
                return None;
            }
            tokens
        }
    };

    Some(tokens[tokens.len() - count..].to_vec())
}

fn month_tokens(text: &str) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    for m in MONTH_RE.find_iter(text) {
        let token = normalize_month_token(m.as_str());
        if !ordered.contains(&token) {
            ordered.push(token);
        }
    }
    ordered
}

fn normalize_month_token(token: &str) -> String {
    let collapsed = token.split_whitespace().collect::<Vec<_>>().join(" ");
    SEPARATOR_RE.replace_all(&collapsed, "$1").into_owned()
}

//! Change / percent-change extraction from compound text

use std::sync::OnceLock;

use regex::Regex;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?\d*\.?\d+").expect("valid pattern"))
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([-+]?\d*\.?\d+)").expect("valid pattern"))
}

/// Pull the raw change and percent change out of a compound text such as
/// `"-1.25 (-3.4%)"`.
///
/// Two independent searches: the first signed decimal anywhere is the raw
/// change, the first signed decimal after an opening parenthesis is the
/// percent. Each side is `None` on its own when its pattern finds nothing,
/// so a text like `"+0.5"` still yields its change.
pub fn extract(text: &str) -> (Option<f64>, Option<f64>) {
    let change = number_re()
        .find(text)
        .and_then(|m| m.as_str().parse().ok());
    let pct = percent_re()
        .captures(text)
        .and_then(|c| c[1].parse().ok());
    (change, pct)
}

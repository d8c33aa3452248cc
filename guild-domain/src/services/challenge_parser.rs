//! Parser for the guild challenge panel, pasted as quantity/name pairs:
//!
//! ```text
//! 35
//! Siren's Soulstone21h
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::ChallengeItemEntry;

static QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d,]+$").expect("valid regex"));
static TRAILING_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+[a-z]+$").expect("valid regex"));

pub fn parse_challenge_data(text: &str) -> Vec<ChallengeItemEntry> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let token: String = lines[i].chars().filter(|c| !c.is_whitespace()).collect();
        if QUANTITY_RE.is_match(&token) && i + 1 < lines.len() {
            let quantity = token.replace(',', "").parse::<i64>().unwrap_or(0);
            let name = TRAILING_TIMESTAMP_RE.replace(lines[i + 1], "");
            let name = name.trim();
            if quantity > 0 && !name.is_empty() {
                entries.push(ChallengeItemEntry {
                    name: name.to_string(),
                    quantity,
                });
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    entries
}

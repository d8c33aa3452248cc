//! Activity log parser for text pasted from the in-game guild log.
//!
//! The log alternates member names with the actions they performed:
//!
//! ```text
//! * Alice
//! Participated in a raid.
//! 1d
//! Bob
//! Contributed 1,340 Maple Log
//! ```
//!
//! Names are recognised either by an explicit leading `*` or because the
//! line right after them reads like a raid or contribution. Lines that fit
//! neither pattern are dropped, never reported as errors.

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{Donation, MemberStatusChange, ParseResult, ParsedMember};
use crate::value_objects::StatusAction;

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|\*").expect("valid regex"));
static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[smhdw]$").expect("valid regex"));
static RAID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)participated in a raid").expect("valid regex"));
static CONTRIBUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)contributed\s+([\d,]+)\s+(.+)").expect("valid regex")
});
static JOINED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)joined the guild").expect("valid regex"));
static LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)left the guild").expect("valid regex"));
static KICKED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)kicked from the guild").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after cleaning, or a bare relative timestamp such as `2h`.
    Noise,
    Raid,
    Contribution(Donation),
    Status(StatusAction),
    Text,
}

impl LineKind {
    pub fn is_action(&self) -> bool {
        matches!(self, LineKind::Raid | LineKind::Contribution(_))
    }
}

struct LogLine<'a> {
    raw: &'a str,
    cleaned: String,
}

pub fn strip_emphasis(text: &str) -> String {
    EMPHASIS_RE.replace_all(text, "").trim().to_string()
}

/// Commas are thousands separators; anything unparsable counts as zero.
pub fn parse_quantity(text: &str) -> i64 {
    text.replace(',', "").trim().parse().unwrap_or(0)
}

/// Classifies an already cleaned line. Raid wins over contribution, which
/// wins over the three status phrases.
pub fn classify_line(cleaned: &str) -> LineKind {
    if cleaned.is_empty() || TIMESTAMP_RE.is_match(cleaned) {
        return LineKind::Noise;
    }
    if RAID_RE.is_match(cleaned) {
        return LineKind::Raid;
    }
    if let Some(caps) = CONTRIBUTION_RE.captures(cleaned) {
        return LineKind::Contribution(Donation {
            item: strip_emphasis(&caps[2]),
            quantity: parse_quantity(&caps[1]),
        });
    }
    if JOINED_RE.is_match(cleaned) {
        return LineKind::Status(StatusAction::Joined);
    }
    if LEFT_RE.is_match(cleaned) {
        return LineKind::Status(StatusAction::Left);
    }
    if KICKED_RE.is_match(cleaned) {
        return LineKind::Status(StatusAction::Kicked);
    }
    LineKind::Text
}

/// Groups raids, contributions and status changes under the member named
/// before them. A line becomes a name when it starts with `*` or precedes a
/// raid or contribution; an action line itself never becomes a name, so
/// consecutive actions all belong to the current member.
pub fn parse_activity_log(text: &str) -> ParseResult {
    let lines: Vec<LogLine<'_>> = text
        .lines()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| LogLine {
            raw,
            cleaned: strip_emphasis(raw.trim()),
        })
        .collect();

    let mut result = ParseResult::default();
    let mut current: Option<String> = None;

    for (index, line) in lines.iter().enumerate() {
        let kind = classify_line(&line.cleaned);
        if kind == LineKind::Noise {
            continue;
        }

        let marked = line.raw.starts_with('*');
        let followed_by_action = !kind.is_action()
            && lines[index + 1..]
                .iter()
                .find(|next| !next.cleaned.is_empty())
                .map(|next| classify_line(&next.cleaned).is_action())
                .unwrap_or(false);
        if marked || followed_by_action {
            let ign = line.cleaned.trim_start_matches('*').trim().to_string();
            if !ign.is_empty() {
                current = Some(start_member(&mut result, ign));
            }
            continue;
        }

        let Some(ign) = current.clone() else {
            if !kind.is_action() {
                current = Some(start_member(&mut result, line.cleaned.clone()));
            }
            continue;
        };

        match kind {
            LineKind::Raid => {
                if let Some(member) = result.members.get_mut(&ign) {
                    member.raids += 1;
                }
            }
            LineKind::Contribution(donation) => {
                if donation.item.is_empty() {
                    continue;
                }
                if let Some(member) = result.members.get_mut(&ign) {
                    member.donations.push(donation);
                }
            }
            LineKind::Status(action) => {
                result
                    .member_status_changes
                    .push(MemberStatusChange { ign, action });
            }
            LineKind::Noise | LineKind::Text => {}
        }
    }

    result
}

fn start_member(result: &mut ParseResult, ign: String) -> String {
    result
        .members
        .entry(ign.clone())
        .or_insert_with(|| ParsedMember::new(ign.clone()));
    ign
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(item: &str, quantity: i64) -> Donation {
        Donation {
            item: item.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_repeated_raids_accumulate() {
        let parsed = parse_activity_log(
            "* Alice\nParticipated in a raid.\n1d\n* Alice\nParticipated in a raid.\n2h",
        );
        assert_eq!(parsed.members.len(), 1);
        assert_eq!(parsed.members["Alice"].raids, 2);
    }

    #[test]
    fn test_contributions_are_not_merged() {
        let parsed = parse_activity_log("* Bob\nContributed 100 Iron Ore\nContributed 50 Iron Ore");
        assert_eq!(
            parsed.members["Bob"].donations,
            vec![donation("Iron Ore", 100), donation("Iron Ore", 50)]
        );
    }

    #[test]
    fn test_name_without_marker_detected_by_lookahead() {
        let parsed = parse_activity_log("Carol\nParticipated in a raid.");
        assert_eq!(parsed.members["Carol"].raids, 1);
    }

    #[test]
    fn test_status_change_is_recorded_separately() {
        let parsed = parse_activity_log("* Dave\njoined the guild.");
        assert_eq!(
            parsed.member_status_changes,
            vec![MemberStatusChange {
                ign: "Dave".to_string(),
                action: StatusAction::Joined,
            }]
        );
        assert_eq!(parsed.members["Dave"].raids, 0);
        assert!(parsed.members["Dave"].donations.is_empty());
    }

    #[test]
    fn test_thousands_separator_in_quantity() {
        let parsed = parse_activity_log("* Erin\nContributed 1,340 Maple Log");
        assert_eq!(parsed.members["Erin"].donations, vec![donation("Maple Log", 1340)]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        for input in ["", "   ", "\n\n\t\r\n"] {
            let parsed = parse_activity_log(input);
            assert!(parsed.members.is_empty());
            assert!(parsed.member_status_changes.is_empty());
            assert!(parsed.is_empty());
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "**Alice**\nContributed 5 Iron Ore\n3h\nBob\nParticipated in a raid.\n* Carol\nleft the guild";
        assert_eq!(parse_activity_log(text), parse_activity_log(text));
    }

    #[test]
    fn test_lookahead_does_not_turn_actions_into_names() {
        let parsed = parse_activity_log(
            "Frank\nParticipated in a raid.\nParticipated in a raid.\nContributed 3 Gem\nContributed 4 Gem",
        );
        assert_eq!(parsed.members.len(), 1);
        assert_eq!(parsed.members["Frank"].raids, 2);
        assert_eq!(parsed.members["Frank"].donations.len(), 2);
    }

    #[test]
    fn test_orphan_actions_before_any_name_are_skipped() {
        let parsed = parse_activity_log("Participated in a raid.\nContributed 10 Iron Ore\n* Gina\nParticipated in a raid.");
        assert_eq!(parsed.members.len(), 1);
        assert_eq!(parsed.members["Gina"].raids, 1);
    }

    #[test]
    fn test_first_unrecognised_line_becomes_fallback_name() {
        let parsed = parse_activity_log("Hank\n5m\nleft the guild");
        assert_eq!(parsed.members.keys().collect::<Vec<_>>(), vec!["Hank"]);
        assert_eq!(parsed.member_status_changes[0].action, StatusAction::Left);
        assert_eq!(parsed.member_status_changes[0].ign, "Hank");
    }

    #[test]
    fn test_marker_and_emphasis_are_stripped_from_names_and_items() {
        let parsed = parse_activity_log("**Ivy**\nContributed 2 **Siren's Soulstone**\n*Jon*\nkicked from the guild");
        assert_eq!(parsed.members["Ivy"].donations, vec![donation("Siren's Soulstone", 2)]);
        assert!(parsed.members.contains_key("Jon"));
        assert_eq!(
            parsed.member_status_changes,
            vec![MemberStatusChange {
                ign: "Jon".to_string(),
                action: StatusAction::Kicked,
            }]
        );
    }

    #[test]
    fn test_members_keep_first_seen_order_and_case() {
        let parsed = parse_activity_log(
            "* zed\nParticipated in a raid.\n* Amy\nParticipated in a raid.\n* Zed\nParticipated in a raid.",
        );
        let names: Vec<&str> = parsed.members.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zed", "Amy", "Zed"]);
    }

    #[test]
    fn test_crlf_and_indentation() {
        let parsed = parse_activity_log("* Kim\r\n   PARTICIPATED IN A RAID\r\n  contributed 7 Oak Plank  \r\n");
        assert_eq!(parsed.members["Kim"].raids, 1);
        assert_eq!(parsed.members["Kim"].donations, vec![donation("Oak Plank", 7)]);
    }

    #[test]
    fn test_unparsable_quantity_defaults_to_zero() {
        let parsed = parse_activity_log("* Lou\nContributed ,, Iron Ore");
        assert_eq!(parsed.members["Lou"].donations, vec![donation("Iron Ore", 0)]);
    }

    #[test]
    fn test_unknown_lines_after_a_name_are_ignored() {
        let parsed = parse_activity_log("* Mia\nopened a treasure chest\nParticipated in a raid.");
        assert_eq!(parsed.members.len(), 1);
        assert_eq!(parsed.members["Mia"].raids, 1);
    }

    #[test]
    fn test_classify_line_priority() {
        assert_eq!(classify_line("12d"), LineKind::Noise);
        assert_eq!(classify_line(""), LineKind::Noise);
        assert_eq!(classify_line("Participated in a raid and contributed 5 Gem"), LineKind::Raid);
        assert_eq!(
            classify_line("contributed 5 Gem"),
            LineKind::Contribution(donation("Gem", 5))
        );
        assert_eq!(classify_line("was kicked from the guild"), LineKind::Status(StatusAction::Kicked));
        assert_eq!(classify_line("Alice"), LineKind::Text);
    }
}

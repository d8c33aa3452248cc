use indexmap::IndexSet;

use crate::entities::ParseResult;

/// Distinct donated item names as written in the log. Names differing only
/// by case stay separate; price lookups lower-case them afterwards.
pub fn get_unique_items(result: &ParseResult) -> Vec<String> {
    result
        .members
        .values()
        .flat_map(|member| member.donations.iter())
        .map(|donation| donation.item.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parse_activity_log;

    #[test]
    fn test_unique_items_across_members() {
        let parsed = parse_activity_log(
            "* Ann\nContributed 1 Iron Ore\nContributed 2 Iron Ore\n* Ben\nContributed 3 iron ore\nContributed 4 Gem\nParticipated in a raid.",
        );
        assert_eq!(
            get_unique_items(&parsed),
            vec!["Iron Ore".to_string(), "iron ore".to_string(), "Gem".to_string()]
        );
    }

    #[test]
    fn test_no_donations_no_items() {
        let parsed = parse_activity_log("* Ann\nParticipated in a raid.");
        assert!(get_unique_items(&parsed).is_empty());
    }
}

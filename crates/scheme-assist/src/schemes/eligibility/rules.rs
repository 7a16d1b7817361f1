use chrono::{Datelike, NaiveDate};

use super::super::domain::HouseholdMember;

/// Inclusive age band for primary school.
const PRIMARY_SCHOOL_AGE: std::ops::RangeInclusive<i32> = 6..=12;

/// Age as a plain year difference, ignoring month and day, so a child can
/// register a year older than their true age for part of the year. The age
/// band compensates by being generous at both ends.
pub(crate) fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - date_of_birth.year()
}

/// A household member counts as a child when the free-text relation contains
/// "son" or "daughter" (case-insensitive), so "Step-Son" and
/// "adopted daughter" both match.
pub(crate) fn is_child_relation(relation: &str) -> bool {
    let relation = relation.to_ascii_lowercase();
    relation.contains("son") || relation.contains("daughter")
}

/// True when at least one household child falls inside the school level's age
/// band. Only "primary" has a band; any other level matches no one, a known
/// limitation carried over until the rule set grows.
pub(crate) fn has_school_age_child(
    household: &[HouseholdMember],
    school_level: &str,
    today: NaiveDate,
) -> bool {
    if !school_level.eq_ignore_ascii_case("primary") {
        return false;
    }

    household.iter().any(|member| {
        is_child_relation(&member.relation)
            && PRIMARY_SCHOOL_AGE.contains(&age_in_years(member.date_of_birth, today))
    })
}

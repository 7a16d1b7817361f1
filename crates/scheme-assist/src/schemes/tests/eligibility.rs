use chrono::Datelike;

use super::common::*;
use crate::schemes::domain::{ChildCriteria, Criteria, EmploymentStatus, MaritalStatus};
use crate::schemes::eligibility::is_eligible_on;

#[test]
fn empty_criteria_accepts_every_applicant() {
    let scheme = scheme_named("Universal Support", Criteria::default());

    for (employment, marital) in [
        (EmploymentStatus::Employed, MaritalStatus::Married),
        (EmploymentStatus::Unemployed, MaritalStatus::Single),
        (EmploymentStatus::Unemployed, MaritalStatus::Widowed),
    ] {
        assert!(is_eligible_on(&applicant(employment, marital), &scheme, today()));
    }
}

#[test]
fn employment_mismatch_fails_regardless_of_other_fields() {
    let scheme = scheme_named("Retrenchment Assistance", unemployed_criteria());
    let mut employed = applicant(EmploymentStatus::Employed, MaritalStatus::Single);
    employed.household.push(member("daughter", 2017));

    assert!(!is_eligible_on(&employed, &scheme, today()));
}

#[test]
fn marital_mismatch_fails() {
    let criteria = Criteria {
        marital_status: Some(MaritalStatus::Widowed),
        ..Criteria::default()
    };
    let scheme = scheme_named("Widow Support", criteria);

    let widowed = applicant(EmploymentStatus::Employed, MaritalStatus::Widowed);
    let married = applicant(EmploymentStatus::Employed, MaritalStatus::Married);

    assert!(is_eligible_on(&widowed, &scheme, today()));
    assert!(!is_eligible_on(&married, &scheme, today()));
}

#[test]
fn unemployed_single_applicant_matches_unemployment_criterion() {
    // Scenario A: no household, employment criterion only.
    let scheme = scheme_named("Retrenchment Assistance", unemployed_criteria());
    let subject = applicant(EmploymentStatus::Unemployed, MaritalStatus::Single);

    assert!(is_eligible_on(&subject, &scheme, today()));
}

#[test]
fn child_criterion_fails_with_empty_household() {
    // Scenario B: same applicant, scheme additionally requires a primary
    // school child.
    let scheme = scheme_named(
        "Retrenchment Assistance (Families)",
        unemployed_with_primary_child_criteria(),
    );
    let subject = applicant(EmploymentStatus::Unemployed, MaritalStatus::Single);

    assert!(!is_eligible_on(&subject, &scheme, today()));
}

#[test]
fn child_criterion_passes_with_primary_school_daughter() {
    // Scenario C: a nine-year-old daughter satisfies the child clause.
    let scheme = scheme_named(
        "Retrenchment Assistance (Families)",
        unemployed_with_primary_child_criteria(),
    );
    let mut subject = applicant(EmploymentStatus::Unemployed, MaritalStatus::Single);
    subject.household.push(member("daughter", today().year() - 9));

    assert!(is_eligible_on(&subject, &scheme, today()));
}

#[test]
fn primary_school_age_band_is_inclusive() {
    let scheme = scheme_named(
        "Family Support",
        Criteria {
            has_children: Some(ChildCriteria {
                school_level: Some("primary".to_string()),
            }),
            ..Criteria::default()
        },
    );

    for (age, expected) in [(5, false), (6, true), (12, true), (13, false)] {
        let mut subject = applicant(EmploymentStatus::Employed, MaritalStatus::Married);
        subject.household.push(member("daughter", today().year() - age));
        assert_eq!(
            is_eligible_on(&subject, &scheme, today()),
            expected,
            "age {age}"
        );
    }
}

#[test]
fn relation_matching_is_substring_and_case_insensitive() {
    let scheme = scheme_named(
        "Family Support",
        Criteria {
            has_children: Some(ChildCriteria {
                school_level: Some("primary".to_string()),
            }),
            ..Criteria::default()
        },
    );

    let mut subject = applicant(EmploymentStatus::Employed, MaritalStatus::Married);
    subject.household.push(member("Step-Son", today().year() - 8));
    assert!(is_eligible_on(&subject, &scheme, today()));

    let mut spouse_only = applicant(EmploymentStatus::Employed, MaritalStatus::Married);
    spouse_only.household.push(member("spouse", today().year() - 8));
    assert!(!is_eligible_on(&spouse_only, &scheme, today()));
}

#[test]
fn unknown_school_levels_never_match() {
    let scheme = scheme_named(
        "Secondary Family Support",
        Criteria {
            has_children: Some(ChildCriteria {
                school_level: Some("secondary".to_string()),
            }),
            ..Criteria::default()
        },
    );

    let mut subject = applicant(EmploymentStatus::Employed, MaritalStatus::Married);
    subject.household.push(member("son", today().year() - 14));
    subject.household.push(member("daughter", today().year() - 9));

    assert!(!is_eligible_on(&subject, &scheme, today()));
}

#[test]
fn blank_school_level_constrains_nothing() {
    let scheme = scheme_named(
        "Open Support",
        Criteria {
            has_children: Some(ChildCriteria { school_level: None }),
            ..Criteria::default()
        },
    );
    let subject = applicant(EmploymentStatus::Employed, MaritalStatus::Single);

    assert!(is_eligible_on(&subject, &scheme, today()));
}

#[test]
fn direct_clauses_ignore_household_and_child_clause_ignores_applicant() {
    // The applicant is unemployed; an employed spouse in the household must
    // not defeat the employment criterion.
    let scheme = scheme_named("Retrenchment Assistance", unemployed_criteria());
    let mut subject = applicant(EmploymentStatus::Unemployed, MaritalStatus::Married);
    let mut spouse = member("spouse", 1988);
    spouse.employment_status = EmploymentStatus::Employed;
    subject.household.push(spouse);

    assert!(is_eligible_on(&subject, &scheme, today()));

    // Conversely, an applicant in the primary-school age band does not
    // satisfy the child clause: only household members are scanned.
    let child_scheme = scheme_named(
        "Family Support",
        Criteria {
            has_children: Some(ChildCriteria {
                school_level: Some("primary".to_string()),
            }),
            ..Criteria::default()
        },
    );
    let mut young_applicant = applicant(EmploymentStatus::Unemployed, MaritalStatus::Single);
    young_applicant.date_of_birth =
        chrono::NaiveDate::from_ymd_opt(today().year() - 9, 1, 2).expect("valid date");

    assert!(!is_eligible_on(&young_applicant, &child_scheme, today()));
}

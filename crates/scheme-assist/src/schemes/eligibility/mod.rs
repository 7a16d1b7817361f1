mod rules;

use chrono::{Local, NaiveDate};

use super::domain::{Applicant, Scheme};

/// Decides whether an applicant satisfies every populated criterion on a
/// scheme. Pure and deterministic for a given `today`; performs no I/O.
///
/// The check is a logical AND over independently optional clauses, each
/// vacuously true when its criterion is absent: a scheme with empty criteria
/// accepts every applicant. The employment and marital clauses look only at
/// the applicant record; the child clause looks only at household members.
pub fn is_eligible_on(applicant: &Applicant, scheme: &Scheme, today: NaiveDate) -> bool {
    let criteria = &scheme.criteria;

    if let Some(required) = criteria.employment_status {
        if applicant.employment_status != required {
            return false;
        }
    }

    if let Some(required) = criteria.marital_status {
        if applicant.marital_status != required {
            return false;
        }
    }

    if let Some(level) = criteria.school_level() {
        if !rules::has_school_age_child(&applicant.household, level, today) {
            return false;
        }
    }

    true
}

/// [`is_eligible_on`] against the local calendar date.
pub fn is_eligible(applicant: &Applicant, scheme: &Scheme) -> bool {
    is_eligible_on(applicant, scheme, Local::now().date_naive())
}

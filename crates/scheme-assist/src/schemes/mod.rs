//! Financial-assistance schemes: domain records, the eligibility evaluator,
//! store abstractions, the orchestrating service, and the HTTP router.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, ApplicantUpdate, Application, ApplicationId, ApplicationRequest,
    ApplicationStatus, ApplicationUpdate, Benefit, ChildCriteria, Criteria, EmploymentStatus,
    HouseholdMember, MaritalStatus, NewApplicant, NewBenefit, NewHouseholdMember, NewScheme,
    Scheme, SchemeId, SchemeUpdate, StatusParseError,
};
pub use eligibility::{is_eligible, is_eligible_on};
pub use repository::{ApplicantStore, ApplicationStore, SchemeStore, StoreError};
pub use router::api_router;
pub use service::{ApplicationDetail, EligibilityService, ServiceError};

use super::domain::{Applicant, ApplicantId, Application, ApplicationId, Scheme, SchemeId};

/// Error enumeration for store failures. I/O problems surface as
/// `Unavailable` and are propagated unchanged by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for applicants. `fetch` must return the applicant
/// together with its full, ordered household; the evaluator never sees a
/// partially populated record. `list` is ordered by name ascending.
pub trait ApplicantStore: Send + Sync {
    fn list(&self) -> Result<Vec<Applicant>, StoreError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, StoreError>;
    fn insert(&self, applicant: Applicant) -> Result<Applicant, StoreError>;
    fn update(&self, applicant: Applicant) -> Result<(), StoreError>;
    fn delete(&self, id: &ApplicantId) -> Result<(), StoreError>;
}

/// Storage abstraction for schemes, each returned with criteria and benefits
/// populated. `list` is ordered by name ascending; eligibility results
/// inherit that order.
pub trait SchemeStore: Send + Sync {
    fn list(&self) -> Result<Vec<Scheme>, StoreError>;
    fn fetch(&self, id: &SchemeId) -> Result<Option<Scheme>, StoreError>;
    fn insert(&self, scheme: Scheme) -> Result<Scheme, StoreError>;
    fn update(&self, scheme: Scheme) -> Result<(), StoreError>;
    fn delete(&self, id: &SchemeId) -> Result<(), StoreError>;
}

/// Storage abstraction for applications. `list` is ordered by application
/// date, newest first. Inserts happen only through the eligibility-gated
/// service path; nothing else constructs applications.
pub trait ApplicationStore: Send + Sync {
    fn list(&self) -> Result<Vec<Application>, StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn insert(&self, application: Application) -> Result<Application, StoreError>;
    fn update(&self, application: Application) -> Result<(), StoreError>;
    fn delete(&self, id: &ApplicationId) -> Result<(), StoreError>;
}

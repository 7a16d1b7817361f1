use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::response::Response;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::schemes::domain::{
    Applicant, ApplicantId, Application, ApplicationId, ChildCriteria, Criteria, EmploymentStatus,
    HouseholdMember, MaritalStatus, Scheme, SchemeId,
};
use crate::schemes::repository::{
    ApplicantStore, ApplicationStore, SchemeStore, StoreError,
};
use crate::schemes::router::api_router;
use crate::schemes::service::EligibilityService;

/// Fixed evaluation date for the pure evaluator tests.
pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn applicant(
    employment_status: EmploymentStatus,
    marital_status: MaritalStatus,
) -> Applicant {
    Applicant {
        id: ApplicantId("applicant-1".to_string()),
        name: "Jordan Tan".to_string(),
        employment_status,
        sex: "female".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1989, 4, 12).expect("valid date"),
        marital_status,
        created_at: timestamp(),
        updated_at: timestamp(),
        household: Vec::new(),
    }
}

pub(super) fn member(relation: &str, birth_year: i32) -> HouseholdMember {
    HouseholdMember {
        id: format!("member-{relation}-{birth_year}"),
        applicant_id: ApplicantId("applicant-1".to_string()),
        name: "Household Member".to_string(),
        employment_status: EmploymentStatus::Unemployed,
        sex: "male".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(birth_year, 3, 10).expect("valid date"),
        relation: relation.to_string(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// A household child whose age relative to the real calendar is fixed, for
/// service-level tests that evaluate against the local date.
pub(super) fn child_aged_now(relation: &str, age: i32) -> HouseholdMember {
    member(relation, Local::now().date_naive().year() - age)
}

pub(super) fn scheme_named(name: &str, criteria: Criteria) -> Scheme {
    Scheme {
        id: SchemeId(format!("scheme-{}", name.to_ascii_lowercase().replace(' ', "-"))),
        name: name.to_string(),
        description: format!("{name} assistance"),
        criteria,
        created_at: timestamp(),
        updated_at: timestamp(),
        benefits: Vec::new(),
    }
}

pub(super) fn unemployed_criteria() -> Criteria {
    Criteria {
        employment_status: Some(EmploymentStatus::Unemployed),
        ..Criteria::default()
    }
}

pub(super) fn unemployed_with_primary_child_criteria() -> Criteria {
    Criteria {
        employment_status: Some(EmploymentStatus::Unemployed),
        marital_status: None,
        has_children: Some(ChildCriteria {
            school_level: Some("primary".to_string()),
        }),
    }
}

/// Keyed rows behind a mutex; the shared body of the store doubles.
struct Table<K, V> {
    rows: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Table<K, V> {
    fn guard(&self) -> MutexGuard<'_, HashMap<K, V>> {
        self.rows.lock().expect("store mutex poisoned")
    }

    fn rows(&self) -> Vec<V> {
        self.guard().values().cloned().collect()
    }

    fn row(&self, key: &K) -> Option<V> {
        self.guard().get(key).cloned()
    }

    fn add(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut guard = self.guard();
        if guard.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        guard.insert(key, value);
        Ok(())
    }

    fn replace(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut guard = self.guard();
        if !guard.contains_key(&key) {
            return Err(StoreError::NotFound);
        }
        guard.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<(), StoreError> {
        self.guard().remove(key).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryApplicants {
    table: Table<ApplicantId, Applicant>,
}

impl ApplicantStore for MemoryApplicants {
    fn list(&self) -> Result<Vec<Applicant>, StoreError> {
        let mut applicants = self.table.rows();
        applicants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(applicants)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, StoreError> {
        Ok(self.table.row(id))
    }

    fn insert(&self, applicant: Applicant) -> Result<Applicant, StoreError> {
        self.table.add(applicant.id.clone(), applicant.clone())?;
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), StoreError> {
        self.table.replace(applicant.id.clone(), applicant)
    }

    fn delete(&self, id: &ApplicantId) -> Result<(), StoreError> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub(super) struct MemorySchemes {
    table: Table<SchemeId, Scheme>,
}

impl SchemeStore for MemorySchemes {
    fn list(&self) -> Result<Vec<Scheme>, StoreError> {
        let mut schemes = self.table.rows();
        schemes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schemes)
    }

    fn fetch(&self, id: &SchemeId) -> Result<Option<Scheme>, StoreError> {
        Ok(self.table.row(id))
    }

    fn insert(&self, scheme: Scheme) -> Result<Scheme, StoreError> {
        self.table.add(scheme.id.clone(), scheme.clone())?;
        Ok(scheme)
    }

    fn update(&self, scheme: Scheme) -> Result<(), StoreError> {
        self.table.replace(scheme.id.clone(), scheme)
    }

    fn delete(&self, id: &SchemeId) -> Result<(), StoreError> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    table: Table<ApplicationId, Application>,
}

impl MemoryApplications {
    pub(super) fn len(&self) -> usize {
        self.table.guard().len()
    }
}

impl ApplicationStore for MemoryApplications {
    fn list(&self) -> Result<Vec<Application>, StoreError> {
        let mut applications = self.table.rows();
        applications.sort_by(|a, b| b.application_date.cmp(&a.application_date));
        Ok(applications)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self.table.row(id))
    }

    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        self.table.add(application.id.clone(), application.clone())?;
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), StoreError> {
        self.table.replace(application.id.clone(), application)
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), StoreError> {
        self.table.remove(id)
    }
}

/// Application store that refuses everything, for propagation tests.
pub(super) struct UnavailableApplications;

impl ApplicationStore for UnavailableApplications {
    fn list(&self) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ApplicationId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = EligibilityService<MemoryApplicants, MemorySchemes, MemoryApplications>;

pub(super) fn build_service() -> (
    Arc<MemoryService>,
    Arc<MemoryApplicants>,
    Arc<MemorySchemes>,
    Arc<MemoryApplications>,
) {
    let applicants = Arc::new(MemoryApplicants::default());
    let schemes = Arc::new(MemorySchemes::default());
    let applications = Arc::new(MemoryApplications::default());
    let service = Arc::new(EligibilityService::new(
        applicants.clone(),
        schemes.clone(),
        applications.clone(),
    ));
    (service, applicants, schemes, applications)
}

pub(super) fn router_with(service: Arc<MemoryService>) -> axum::Router {
    api_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

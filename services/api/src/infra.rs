use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_assist::schemes::{
    Applicant, ApplicantId, ApplicantStore, Application, ApplicationId, ApplicationStore,
    ChildCriteria, Criteria, EligibilityService, EmploymentStatus, MaritalStatus, NewApplicant,
    NewBenefit, NewHouseholdMember, NewScheme, Scheme, SchemeId, SchemeStore, ServiceError,
    StoreError,
};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keyed rows behind a mutex; the shared body of the in-memory stores.
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
pub(crate) struct InMemoryApplicantStore {
    table: Table<ApplicantId, Applicant>,
}

impl ApplicantStore for InMemoryApplicantStore {
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
pub(crate) struct InMemorySchemeStore {
    table: Table<SchemeId, Scheme>,
}

impl SchemeStore for InMemorySchemeStore {
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
pub(crate) struct InMemoryApplicationStore {
    table: Table<ApplicationId, Application>,
}

impl ApplicationStore for InMemoryApplicationStore {
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

pub(crate) type PlatformService =
    EligibilityService<InMemoryApplicantStore, InMemorySchemeStore, InMemoryApplicationStore>;

pub(crate) fn build_platform_service() -> Arc<PlatformService> {
    Arc::new(EligibilityService::new(
        Arc::new(InMemoryApplicantStore::default()),
        Arc::new(InMemorySchemeStore::default()),
        Arc::new(InMemoryApplicationStore::default()),
    ))
}

/// Demonstration records standing in for the seed script a database-backed
/// deployment would run at provision time.
pub(crate) fn seed_demo_records(
    service: &PlatformService,
) -> Result<SeededRecords, ServiceError> {
    let retrenched_parent = service.create_applicant(NewApplicant {
        name: "Mei Lin".to_string(),
        employment_status: EmploymentStatus::Unemployed,
        sex: "female".to_string(),
        date_of_birth: date(1991, 7, 4),
        marital_status: MaritalStatus::Single,
        household: vec![NewHouseholdMember {
            name: "Hana Lin".to_string(),
            employment_status: EmploymentStatus::Unemployed,
            sex: "female".to_string(),
            date_of_birth: school_age_birth_date(),
            relation: "daughter".to_string(),
        }],
    })?;

    let employed_single = service.create_applicant(NewApplicant {
        name: "Jordan Tan".to_string(),
        employment_status: EmploymentStatus::Employed,
        sex: "male".to_string(),
        date_of_birth: date(1989, 4, 12),
        marital_status: MaritalStatus::Single,
        household: Vec::new(),
    })?;

    let retrenchment_scheme = service.create_scheme(NewScheme {
        name: "Retrenchment Assistance Scheme".to_string(),
        description: "Financial support for citizens retrenched from their jobs".to_string(),
        criteria: Criteria {
            employment_status: Some(EmploymentStatus::Unemployed),
            marital_status: None,
            has_children: None,
        },
        benefits: vec![NewBenefit {
            name: "SkillsFuture Credits".to_string(),
            description: Some("Additional credits for course fees".to_string()),
            amount: Some(500.0),
        }],
    })?;

    let family_scheme = service.create_scheme(NewScheme {
        name: "Retrenchment Assistance Scheme (Families)".to_string(),
        description: "Enhanced support for retrenched parents of school children".to_string(),
        criteria: Criteria {
            employment_status: Some(EmploymentStatus::Unemployed),
            marital_status: None,
            has_children: Some(ChildCriteria {
                school_level: Some("primary".to_string()),
            }),
        },
        benefits: vec![
            NewBenefit {
                name: "Monthly cash payout".to_string(),
                description: Some("Six months of household support".to_string()),
                amount: Some(600.0),
            },
            NewBenefit {
                name: "School meal vouchers".to_string(),
                description: Some("Daily school meal vouchers for primary school children".to_string()),
                amount: None,
            },
        ],
    })?;

    Ok(SeededRecords {
        retrenched_parent,
        employed_single,
        retrenchment_scheme,
        family_scheme,
    })
}

pub(crate) struct SeededRecords {
    pub(crate) retrenched_parent: Applicant,
    pub(crate) employed_single: Applicant,
    pub(crate) retrenchment_scheme: Scheme,
    pub(crate) family_scheme: Scheme,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Birth date that puts the child inside the primary school band relative to
/// the current year, which is what the evaluator compares against.
fn school_age_birth_date() -> NaiveDate {
    use chrono::Datelike;
    let year = chrono::Local::now().date_naive().year() - 9;
    date(year, 5, 20)
}

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::domain::{
    Applicant, ApplicantId, ApplicantUpdate, Application, ApplicationId, ApplicationRequest,
    ApplicationStatus, ApplicationUpdate, Benefit, HouseholdMember, NewApplicant, NewScheme,
    Scheme, SchemeId, SchemeUpdate,
};
use super::eligibility::is_eligible;
use super::repository::{ApplicantStore, ApplicationStore, SchemeStore, StoreError};

/// Orchestrator for eligibility queries and the surrounding CRUD surface.
///
/// Holds explicit store handles rather than any process-global connection;
/// every operation reads its own snapshot, so instances are stateless and
/// safe to share across requests. The read-evaluate-write sequence in
/// [`create_application`](Self::create_application) is not atomic against
/// concurrent store mutation; callers accept eventual consistency there.
pub struct EligibilityService<A, S, P> {
    applicants: Arc<A>,
    schemes: Arc<S>,
    applications: Arc<P>,
}

/// An application joined with its applicant (household included) and scheme,
/// the shape API responses carry.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub applicant: Applicant,
    pub scheme: Scheme,
}

/// Error raised by the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("applicant not found: {0}")]
    ApplicantNotFound(ApplicantId),
    #[error("scheme not found: {0}")]
    SchemeNotFound(SchemeId),
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),
    #[error("applicant {applicant_id} is not eligible for scheme {scheme_id}")]
    Ineligible {
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl<A, S, P> EligibilityService<A, S, P>
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    pub fn new(applicants: Arc<A>, schemes: Arc<S>, applications: Arc<P>) -> Self {
        Self {
            applicants,
            schemes,
            applications,
        }
    }

    // Applicants

    pub fn list_applicants(&self) -> Result<Vec<Applicant>, ServiceError> {
        Ok(self.applicants.list()?)
    }

    pub fn get_applicant(&self, id: &ApplicantId) -> Result<Applicant, ServiceError> {
        self.applicants
            .fetch(id)?
            .ok_or_else(|| ServiceError::ApplicantNotFound(id.clone()))
    }

    pub fn create_applicant(&self, new: NewApplicant) -> Result<Applicant, ServiceError> {
        let now = Utc::now();
        let id = ApplicantId(new_id());

        let household = new
            .household
            .into_iter()
            .map(|member| HouseholdMember {
                id: new_id(),
                applicant_id: id.clone(),
                name: member.name,
                employment_status: member.employment_status,
                sex: member.sex,
                date_of_birth: member.date_of_birth,
                relation: member.relation,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let applicant = Applicant {
            id,
            name: new.name,
            employment_status: new.employment_status,
            sex: new.sex,
            date_of_birth: new.date_of_birth,
            marital_status: new.marital_status,
            created_at: now,
            updated_at: now,
            household,
        };

        let stored = self.applicants.insert(applicant)?;
        info!(applicant_id = %stored.id, "applicant created");
        Ok(stored)
    }

    pub fn update_applicant(
        &self,
        id: &ApplicantId,
        update: ApplicantUpdate,
    ) -> Result<Applicant, ServiceError> {
        let mut applicant = self.get_applicant(id)?;

        applicant.name = update.name;
        applicant.employment_status = update.employment_status;
        applicant.sex = update.sex;
        applicant.date_of_birth = update.date_of_birth;
        applicant.marital_status = update.marital_status;
        applicant.updated_at = Utc::now();

        self.applicants.update(applicant.clone())?;
        Ok(applicant)
    }

    pub fn delete_applicant(&self, id: &ApplicantId) -> Result<(), ServiceError> {
        self.get_applicant(id)?;
        Ok(self.applicants.delete(id)?)
    }

    // Schemes

    pub fn list_schemes(&self) -> Result<Vec<Scheme>, ServiceError> {
        Ok(self.schemes.list()?)
    }

    pub fn get_scheme(&self, id: &SchemeId) -> Result<Scheme, ServiceError> {
        self.schemes
            .fetch(id)?
            .ok_or_else(|| ServiceError::SchemeNotFound(id.clone()))
    }

    pub fn create_scheme(&self, new: NewScheme) -> Result<Scheme, ServiceError> {
        let now = Utc::now();
        let id = SchemeId(new_id());

        let benefits = new
            .benefits
            .into_iter()
            .map(|benefit| Benefit {
                id: new_id(),
                scheme_id: id.clone(),
                name: benefit.name,
                description: benefit.description,
                amount: benefit.amount,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let scheme = Scheme {
            id,
            name: new.name,
            description: new.description,
            criteria: new.criteria,
            created_at: now,
            updated_at: now,
            benefits,
        };

        let stored = self.schemes.insert(scheme)?;
        info!(scheme_id = %stored.id, "scheme created");
        Ok(stored)
    }

    pub fn update_scheme(
        &self,
        id: &SchemeId,
        update: SchemeUpdate,
    ) -> Result<Scheme, ServiceError> {
        let mut scheme = self.get_scheme(id)?;

        scheme.name = update.name;
        scheme.description = update.description;
        scheme.criteria = update.criteria;
        scheme.updated_at = Utc::now();

        self.schemes.update(scheme.clone())?;
        Ok(scheme)
    }

    pub fn delete_scheme(&self, id: &SchemeId) -> Result<(), ServiceError> {
        self.get_scheme(id)?;
        Ok(self.schemes.delete(id)?)
    }

    // Eligibility

    /// Every scheme the applicant currently qualifies for, in the store's
    /// name order. Read-only: two store reads, no writes.
    pub fn eligible_schemes(&self, applicant_id: &ApplicantId) -> Result<Vec<Scheme>, ServiceError> {
        let applicant = self.get_applicant(applicant_id)?;
        let schemes = self.schemes.list()?;

        let eligible: Vec<Scheme> = schemes
            .into_iter()
            .filter(|scheme| is_eligible(&applicant, scheme))
            .collect();

        debug!(
            applicant_id = %applicant.id,
            matched = eligible.len(),
            "eligibility query evaluated"
        );
        Ok(eligible)
    }

    // Applications

    /// The only path that creates applications. Loads both referenced
    /// records, evaluates eligibility, and refuses to write anything when the
    /// applicant does not qualify.
    pub fn create_application(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationDetail, ServiceError> {
        let applicant = self.get_applicant(&request.applicant_id)?;
        let scheme = self.get_scheme(&request.scheme_id)?;

        if !is_eligible(&applicant, &scheme) {
            debug!(
                applicant_id = %applicant.id,
                scheme_id = %scheme.id,
                "application refused: criteria not met"
            );
            return Err(ServiceError::Ineligible {
                applicant_id: applicant.id,
                scheme_id: scheme.id,
            });
        }

        let now = Utc::now();
        let application = Application {
            id: ApplicationId(new_id()),
            applicant_id: applicant.id.clone(),
            scheme_id: scheme.id.clone(),
            status: ApplicationStatus::Pending,
            application_date: now,
            decision_date: None,
            notes: request.notes.filter(|notes| !notes.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        let stored = self.applications.insert(application)?;
        info!(
            application_id = %stored.id,
            applicant_id = %stored.applicant_id,
            scheme_id = %stored.scheme_id,
            "application created"
        );

        Ok(ApplicationDetail {
            application: stored,
            applicant,
            scheme,
        })
    }

    /// All applications, newest first, each joined with its applicant and
    /// scheme. Entries whose referenced records have since been deleted are
    /// skipped rather than failing the whole listing.
    pub fn list_applications(&self) -> Result<Vec<ApplicationDetail>, ServiceError> {
        let applications = self.applications.list()?;

        let mut details = Vec::with_capacity(applications.len());
        for application in applications {
            let applicant = self.applicants.fetch(&application.applicant_id)?;
            let scheme = self.schemes.fetch(&application.scheme_id)?;
            if let (Some(applicant), Some(scheme)) = (applicant, scheme) {
                details.push(ApplicationDetail {
                    application,
                    applicant,
                    scheme,
                });
            }
        }
        Ok(details)
    }

    pub fn get_application(&self, id: &ApplicationId) -> Result<ApplicationDetail, ServiceError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or_else(|| ServiceError::ApplicationNotFound(id.clone()))?;
        let applicant = self.get_applicant(&application.applicant_id)?;
        let scheme = self.get_scheme(&application.scheme_id)?;

        Ok(ApplicationDetail {
            application,
            applicant,
            scheme,
        })
    }

    /// Mutate status and/or notes. A transition to approved or rejected
    /// stamps the decision date; moving back to pending clears it.
    pub fn update_application(
        &self,
        id: &ApplicationId,
        update: ApplicationUpdate,
    ) -> Result<ApplicationDetail, ServiceError> {
        let mut application = self
            .applications
            .fetch(id)?
            .ok_or_else(|| ServiceError::ApplicationNotFound(id.clone()))?;

        let now = Utc::now();
        if let Some(status) = update.status {
            application.set_status(status, now);
        }
        if let Some(notes) = update.notes.filter(|notes| !notes.trim().is_empty()) {
            application.notes = Some(notes);
        }
        application.updated_at = now;

        self.applications.update(application.clone())?;

        let applicant = self.get_applicant(&application.applicant_id)?;
        let scheme = self.get_scheme(&application.scheme_id)?;
        Ok(ApplicationDetail {
            application,
            applicant,
            scheme,
        })
    }

    pub fn delete_application(&self, id: &ApplicationId) -> Result<(), ServiceError> {
        self.applications
            .fetch(id)?
            .ok_or_else(|| ServiceError::ApplicationNotFound(id.clone()))?;
        Ok(self.applications.delete(id)?)
    }
}

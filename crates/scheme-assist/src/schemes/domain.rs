use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applicants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Identifier wrapper for assistance schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when a wire or storage value does not name a known status.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized {field} '{value}'")]
pub struct StatusParseError {
    field: &'static str,
    value: String,
}

/// Whether the person currently holds employment.
///
/// Statuses arrive as free-form strings from the wire; parsing is
/// case-insensitive so `"Unemployed"` and `"unemployed"` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::Unemployed => "unemployed",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employed" => Ok(Self::Employed),
            "unemployed" => Ok(Self::Unemployed),
            _ => Err(StatusParseError {
                field: "employment status",
                value: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EmploymentStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmploymentStatus> for String {
    fn from(value: EmploymentStatus) -> Self {
        value.label().to_string()
    }
}

/// Marital status as declared on the applicant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Widowed => "widowed",
            MaritalStatus::Divorced => "divorced",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "married" => Ok(Self::Married),
            "widowed" => Ok(Self::Widowed),
            "divorced" => Ok(Self::Divorced),
            _ => Err(StatusParseError {
                field: "marital status",
                value: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MaritalStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MaritalStatus> for String {
    fn from(value: MaritalStatus) -> Self {
        value.label().to_string()
    }
}

/// Lifecycle status of a submitted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected applications carry a decision date.
    pub const fn is_decided(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

impl FromStr for ApplicationStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(StatusParseError {
                field: "application status",
                value: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        value.label().to_string()
    }
}

/// An individual applying for financial assistance, always carried together
/// with the full household so eligibility never sees a partial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub household: Vec<HouseholdMember>,
}

/// A family member living with the applicant. Belongs to exactly one
/// applicant; the relation stays free text ("son", "step-daughter", ...)
/// and is matched by substring, never parsed into an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub id: String,
    pub applicant_id: ApplicantId,
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub relation: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Eligibility rule set attached to a scheme. Every field is independently
/// optional; an absent (or empty-string) field constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<ChildCriteria>,
}

impl Criteria {
    /// The school-level constraint, if one is actually set. Blank values are
    /// treated the same as an absent rule.
    pub fn school_level(&self) -> Option<&str> {
        self.has_children
            .as_ref()?
            .school_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
    }
}

/// Child-related criteria. `school_level` is free text; only `"primary"`
/// currently has a matching age band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_level: Option<String>,
}

/// A named assistance program with its criteria and granted benefits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub criteria: Criteria,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
}

/// A concrete payout or service granted by an approved scheme. Plays no part
/// in eligibility; carried for response composition only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benefit {
    pub id: String,
    pub scheme_id: SchemeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A request by an applicant to be granted a scheme's benefits. Only created
/// through the eligibility-gated service path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub scheme_id: SchemeId,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Transition the status, deriving the decision date from it: approving
    /// or rejecting stamps `now`, any other status clears the date. The
    /// decision date is never settable on its own.
    pub fn set_status(&mut self, status: ApplicationStatus, now: DateTime<Utc>) {
        self.decision_date = if status.is_decided() { Some(now) } else { None };
        self.status = status;
        self.updated_at = now;
    }
}

/// Intake payload for a new applicant and their household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicant {
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub household: Vec<NewHouseholdMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHouseholdMember {
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub relation: String,
}

/// Update payload for an applicant. The household is managed through its
/// owning applicant's create path and is not replaced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantUpdate {
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub sex: String,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
}

/// Intake payload for a new scheme and the benefits it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheme {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub criteria: Criteria,
    #[serde(default)]
    pub benefits: Vec<NewBenefit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBenefit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Update payload for a scheme. Benefits keep their create-time composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeUpdate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub criteria: Criteria,
}

/// Submission payload for a new application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub applicant_id: ApplicantId,
    pub scheme_id: SchemeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Post-creation mutation of an application: status and notes only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

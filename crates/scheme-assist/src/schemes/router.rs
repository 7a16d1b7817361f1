use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    ApplicantId, ApplicantUpdate, ApplicationId, ApplicationRequest, ApplicationUpdate,
    NewApplicant, NewScheme, Scheme, SchemeId, SchemeUpdate,
};
use super::repository::{ApplicantStore, ApplicationStore, SchemeStore, StoreError};
use super::service::{EligibilityService, ServiceError};

type Service<A, S, P> = Arc<EligibilityService<A, S, P>>;

/// Router builder exposing the `/api` surface: applicant, scheme, and
/// application CRUD plus the eligibility query.
pub fn api_router<A, S, P>(service: Service<A, S, P>) -> Router
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/applicants",
            get(list_applicants::<A, S, P>).post(create_applicant::<A, S, P>),
        )
        .route(
            "/api/applicants/:id",
            get(get_applicant::<A, S, P>)
                .put(update_applicant::<A, S, P>)
                .delete(delete_applicant::<A, S, P>),
        )
        .route(
            "/api/schemes",
            get(list_schemes::<A, S, P>).post(create_scheme::<A, S, P>),
        )
        .route("/api/schemes/eligible", get(eligible_schemes::<A, S, P>))
        .route(
            "/api/schemes/:id",
            get(get_scheme::<A, S, P>)
                .put(update_scheme::<A, S, P>)
                .delete(delete_scheme::<A, S, P>),
        )
        .route(
            "/api/applications",
            get(list_applications::<A, S, P>).post(create_application::<A, S, P>),
        )
        .route(
            "/api/applications/:id",
            get(get_application::<A, S, P>)
                .put(update_application::<A, S, P>)
                .delete(delete_application::<A, S, P>),
        )
        .with_state(service)
}

/// Single place where service errors meet HTTP status codes. Ineligible
/// submissions are a 422, not a 500: the request was well-formed, the
/// applicant just does not qualify.
fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::ApplicantNotFound(_)
        | ServiceError::SchemeNotFound(_)
        | ServiceError::ApplicationNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Ineligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibleQuery {
    /// Applicant identifier, e.g. `/api/schemes/eligible?applicant=<id>`.
    pub(crate) applicant: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibleSchemesResponse {
    pub(crate) applicant_id: ApplicantId,
    pub(crate) schemes: Vec<Scheme>,
}

// Applicants

pub(crate) async fn list_applicants<A, S, P>(State(service): State<Service<A, S, P>>) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.list_applicants() {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_applicant<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.get_applicant(&ApplicantId(id)) {
        Ok(applicant) => (StatusCode::OK, axum::Json(applicant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_applicant<A, S, P>(
    State(service): State<Service<A, S, P>>,
    axum::Json(new): axum::Json<NewApplicant>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.create_applicant(new) {
        Ok(applicant) => (StatusCode::CREATED, axum::Json(applicant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_applicant<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<ApplicantUpdate>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.update_applicant(&ApplicantId(id), update) {
        Ok(applicant) => (StatusCode::OK, axum::Json(applicant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_applicant<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.delete_applicant(&ApplicantId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

// Schemes

pub(crate) async fn list_schemes<A, S, P>(State(service): State<Service<A, S, P>>) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.list_schemes() {
        Ok(schemes) => (StatusCode::OK, axum::Json(schemes)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_scheme<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.get_scheme(&SchemeId(id)) {
        Ok(scheme) => (StatusCode::OK, axum::Json(scheme)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_scheme<A, S, P>(
    State(service): State<Service<A, S, P>>,
    axum::Json(new): axum::Json<NewScheme>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.create_scheme(new) {
        Ok(scheme) => (StatusCode::CREATED, axum::Json(scheme)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_scheme<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<SchemeUpdate>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.update_scheme(&SchemeId(id), update) {
        Ok(scheme) => (StatusCode::OK, axum::Json(scheme)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_scheme<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.delete_scheme(&SchemeId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligible_schemes<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Query(query): Query<EligibleQuery>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    let applicant_id = ApplicantId(query.applicant);
    match service.eligible_schemes(&applicant_id) {
        Ok(schemes) => (
            StatusCode::OK,
            axum::Json(EligibleSchemesResponse {
                applicant_id,
                schemes,
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

// Applications

pub(crate) async fn list_applications<A, S, P>(State(service): State<Service<A, S, P>>) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.list_applications() {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_application<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.get_application(&ApplicationId(id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_application<A, S, P>(
    State(service): State<Service<A, S, P>>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.create_application(request) {
        Ok(detail) => (StatusCode::CREATED, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_application<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<ApplicationUpdate>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.update_application(&ApplicationId(id), update) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_application<A, S, P>(
    State(service): State<Service<A, S, P>>,
    Path(id): Path<String>,
) -> Response
where
    A: ApplicantStore + 'static,
    S: SchemeStore + 'static,
    P: ApplicationStore + 'static,
{
    match service.delete_application(&ApplicationId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

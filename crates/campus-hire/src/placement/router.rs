use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::applications::ApplicationFilter;
use super::categories::CategoryQuery;
use super::dashboard::DashboardStats;
use super::domain::{
    Application, ApplicationId, ApplicationRequest, Category, CategoryDraft, CategoryId, Company,
    CompanyId, CompanyProfile, Drive, DriveId, DriveRequest, DriveStatus, MediaDraft, MediaEntry,
    MediaId, MediaPatch, OfferLetter, OfferLetterRequest, StatusUpdate, Student, StudentId,
    StudentProfile,
};
use super::error::PlacementError;
use super::media::MediaQuery;
use super::offers::OfferLetterFilter;
use super::service::PlacementService;
use super::store::RepositoryError;

type Service = State<Arc<PlacementService>>;

/// Router builder exposing the placement API under `/api`.
pub fn placement_router(service: Arc<PlacementService>) -> Router {
    Router::new()
        .route("/api/students", post(create_student).get(list_students))
        .route(
            "/api/students/:student_id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/companies", post(create_company).get(list_companies))
        .route("/api/companies/:company_id", get(get_company))
        .route("/api/drives", post(create_drive).get(list_drives))
        .route("/api/drives/:drive_id", get(get_drive))
        .route("/api/drives/:drive_id/status", put(update_drive_status))
        .route(
            "/api/applications",
            post(create_application).get(list_applications),
        )
        .route("/api/applications/:application_id", get(get_application))
        .route(
            "/api/applications/:application_id/status",
            put(update_application_status),
        )
        .route(
            "/api/offer-letters",
            post(create_offer_letter).get(list_offer_letters),
        )
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/categories", get(list_categories).post(add_category))
        .route("/api/categories/import", post(import_categories))
        .route("/api/categories/export", get(export_categories))
        .route(
            "/api/categories/:category_id",
            put(rename_category).delete(delete_category),
        )
        .route("/api/avdb", get(list_media).post(add_media))
        .route("/api/avdb/import", post(import_media))
        .route("/api/avdb/export", get(export_media))
        .route(
            "/api/avdb/:entry_id",
            put(update_media).delete(delete_media),
        )
        .with_state(service)
}

impl IntoResponse for PlacementError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlacementError::NotFound { .. } | PlacementError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            PlacementError::Conflict(_)
            | PlacementError::Csv(_)
            | PlacementError::Repository(RepositoryError::Conflict) => StatusCode::BAD_REQUEST,
            PlacementError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlacementError::Export(_)
            | PlacementError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            warn!(error = %self, "placement request failed");
        }

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DriveQuery {
    #[serde(default)]
    status: Option<DriveStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DriveStatusQuery {
    status: DriveStatus,
}

pub(crate) async fn create_student(
    State(service): Service,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<Student>, PlacementError> {
    service.students().register(profile).map(Json)
}

pub(crate) async fn list_students(
    State(service): Service,
) -> Result<Json<Vec<Student>>, PlacementError> {
    service.students().list().map(Json)
}

pub(crate) async fn get_student(
    State(service): Service,
    Path(student_id): Path<String>,
) -> Result<Json<Student>, PlacementError> {
    service.students().get(&StudentId(student_id)).map(Json)
}

pub(crate) async fn update_student(
    State(service): Service,
    Path(student_id): Path<String>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<Student>, PlacementError> {
    service
        .students()
        .update(&StudentId(student_id), profile)
        .map(Json)
}

pub(crate) async fn delete_student(
    State(service): Service,
    Path(student_id): Path<String>,
) -> Result<Json<Value>, PlacementError> {
    service.students().remove(&StudentId(student_id))?;
    Ok(Json(json!({ "message": "Student deleted successfully" })))
}

pub(crate) async fn create_company(
    State(service): Service,
    Json(profile): Json<CompanyProfile>,
) -> Result<Json<Company>, PlacementError> {
    service.companies().create(profile).map(Json)
}

pub(crate) async fn list_companies(
    State(service): Service,
) -> Result<Json<Vec<Company>>, PlacementError> {
    service.companies().list().map(Json)
}

pub(crate) async fn get_company(
    State(service): Service,
    Path(company_id): Path<String>,
) -> Result<Json<Company>, PlacementError> {
    service.companies().get(&CompanyId(company_id)).map(Json)
}

pub(crate) async fn create_drive(
    State(service): Service,
    Json(request): Json<DriveRequest>,
) -> Result<Json<Drive>, PlacementError> {
    service.drives().schedule(request).map(Json)
}

pub(crate) async fn list_drives(
    State(service): Service,
    Query(query): Query<DriveQuery>,
) -> Result<Json<Vec<Drive>>, PlacementError> {
    service.drives().list(query.status).map(Json)
}

pub(crate) async fn get_drive(
    State(service): Service,
    Path(drive_id): Path<String>,
) -> Result<Json<Drive>, PlacementError> {
    service.drives().get(&DriveId(drive_id)).map(Json)
}

pub(crate) async fn update_drive_status(
    State(service): Service,
    Path(drive_id): Path<String>,
    Query(query): Query<DriveStatusQuery>,
) -> Result<Json<Drive>, PlacementError> {
    service
        .drives()
        .update_status(&DriveId(drive_id), query.status)
        .map(Json)
}

pub(crate) async fn create_application(
    State(service): Service,
    Json(request): Json<ApplicationRequest>,
) -> Result<Json<Application>, PlacementError> {
    service.applications().apply(request).map(Json)
}

pub(crate) async fn list_applications(
    State(service): Service,
    Query(filter): Query<ApplicationFilter>,
) -> Result<Json<Vec<Application>>, PlacementError> {
    service.applications().list(&filter).map(Json)
}

pub(crate) async fn get_application(
    State(service): Service,
    Path(application_id): Path<String>,
) -> Result<Json<Application>, PlacementError> {
    service
        .applications()
        .get(&ApplicationId(application_id))
        .map(Json)
}

pub(crate) async fn update_application_status(
    State(service): Service,
    Path(application_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Application>, PlacementError> {
    service
        .applications()
        .update_status(&ApplicationId(application_id), update.status)
        .map(Json)
}

pub(crate) async fn create_offer_letter(
    State(service): Service,
    Json(request): Json<OfferLetterRequest>,
) -> Result<Json<OfferLetter>, PlacementError> {
    service.offers().issue(request).map(Json)
}

pub(crate) async fn list_offer_letters(
    State(service): Service,
    Query(filter): Query<OfferLetterFilter>,
) -> Result<Json<Vec<OfferLetter>>, PlacementError> {
    service.offers().list(&filter).map(Json)
}

pub(crate) async fn dashboard_stats(
    State(service): Service,
) -> Result<Json<DashboardStats>, PlacementError> {
    service.dashboard().stats().map(Json)
}

pub(crate) async fn list_categories(
    State(service): Service,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, PlacementError> {
    service
        .categories()
        .list(query.filter.as_deref())
        .map(Json)
}

pub(crate) async fn add_category(
    State(service): Service,
    Json(draft): Json<CategoryDraft>,
) -> Result<Json<Category>, PlacementError> {
    service.categories().add(draft).map(Json)
}

pub(crate) async fn rename_category(
    State(service): Service,
    Path(category_id): Path<u32>,
    Json(draft): Json<CategoryDraft>,
) -> Result<Json<Category>, PlacementError> {
    service
        .categories()
        .rename(CategoryId(category_id), draft)
        .map(Json)
}

pub(crate) async fn delete_category(
    State(service): Service,
    Path(category_id): Path<u32>,
) -> Result<Json<Value>, PlacementError> {
    service.categories().remove(CategoryId(category_id))?;
    Ok(Json(json!({ "message": "Deleted" })))
}

pub(crate) async fn import_categories(
    State(service): Service,
    body: String,
) -> Result<Json<Value>, PlacementError> {
    let imported = service.categories().import_csv(body.as_bytes())?;
    Ok(Json(json!({ "message": "Imported", "imported": imported.len() })))
}

pub(crate) async fn export_categories(State(service): Service) -> Result<Response, PlacementError> {
    let csv = service.categories().export_csv()?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

pub(crate) async fn list_media(
    State(service): Service,
    Query(query): Query<MediaQuery>,
) -> Result<Json<Vec<MediaEntry>>, PlacementError> {
    service.media().list(query.filter.as_deref()).map(Json)
}

pub(crate) async fn add_media(
    State(service): Service,
    Json(draft): Json<MediaDraft>,
) -> Result<Json<MediaEntry>, PlacementError> {
    service.media().add(draft).map(Json)
}

pub(crate) async fn update_media(
    State(service): Service,
    Path(entry_id): Path<u32>,
    Json(patch): Json<MediaPatch>,
) -> Result<Json<MediaEntry>, PlacementError> {
    service.media().update(MediaId(entry_id), patch).map(Json)
}

pub(crate) async fn delete_media(
    State(service): Service,
    Path(entry_id): Path<u32>,
) -> Result<Json<Value>, PlacementError> {
    service.media().remove(MediaId(entry_id))?;
    Ok(Json(json!({ "message": "Deleted" })))
}

pub(crate) async fn import_media(
    State(service): Service,
    body: String,
) -> Result<Json<Value>, PlacementError> {
    let imported = service.media().import_csv(body.as_bytes())?;
    Ok(Json(json!({ "message": "Imported", "imported": imported.len() })))
}

pub(crate) async fn export_media(State(service): Service) -> Result<Response, PlacementError> {
    let csv = service.media().export_csv()?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::PresensiError;
use crate::model::attendance::AttendanceInput;
use crate::models::ApiResponse;
use crate::store::AttendanceStore;
use crate::utils::datetime::parse_date;

/// `email` and `search_date` select two different queries; at most one may be given.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PresensiQuery {
    /// Exact, case-sensitive email match
    #[schema(example = "budi@example.com")]
    pub email: Option<String>,
    /// ISO-8601 date or date-time; only the calendar date is used
    #[schema(example = "2026-01-05")]
    pub search_date: Option<String>,
}

/// Ids are positive, so any other integer simply matches nothing.
fn record_id(item_id: i64) -> Result<u64, PresensiError> {
    u64::try_from(item_id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(PresensiError::item_not_found)
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/presensi",
    params(PresensiQuery),
    responses(
        (status = 200, description = "Records, an empty result, or an error envelope", body = Object, example = json!({
            "metadata": { "status": "success" },
            "data": [{
                "id": 1,
                "name": "Budi",
                "email": "budi@example.com",
                "createdAt": "2026-01-05T08:00:03.120331",
                "createdTime": "2026-01-05T08:00:00",
                "location": "Head office",
                "status": "masuk"
            }]
        }))
    ),
    tag = "Presensi"
)]
#[instrument(name = "presensi_list", skip(store))]
pub async fn list_presensi(
    store: web::Data<AttendanceStore>,
    query: web::Query<PresensiQuery>,
) -> Result<HttpResponse, PresensiError> {
    let query = query.into_inner();

    let records = match (query.email.as_deref(), query.search_date.as_deref()) {
        (Some(_), Some(_)) => {
            return Err(PresensiError::Validation(
                "Use either email or search_date, not both".to_string(),
            ));
        }
        (email, None) => store.list(email)?,
        (None, Some(search_date)) => {
            let date = parse_date(search_date)?;
            debug!(%date, "filtering by creation date");
            store.list_by_date(date)?
        }
    };

    debug!(count = records.len(), "records listed");
    Ok(HttpResponse::Ok().json(ApiResponse::list(records)))
}

/// Create attendance record
#[utoipa::path(
    post,
    path = "/presensi",
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Stored record with its generated id", body = Object, example = json!({
            "metadata": { "status": "success" },
            "data": {
                "id": 1,
                "name": "Budi",
                "email": "budi@example.com",
                "createdAt": "2026-01-05T08:00:03.120331",
                "createdTime": "2026-01-05T08:00:00",
                "location": "Head office",
                "status": "masuk"
            }
        }))
    ),
    tag = "Presensi"
)]
#[instrument(name = "presensi_create", skip(store, payload), fields(email = %payload.email, status = %payload.status))]
pub async fn create_presensi(
    store: web::Data<AttendanceStore>,
    payload: web::Json<AttendanceInput>,
) -> Result<HttpResponse, PresensiError> {
    let record = store.create(payload.into_inner())?;

    info!(id = record.id, "attendance recorded");
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/// Update attendance record
#[utoipa::path(
    put,
    path = "/presensi/{item_id}",
    params(
        ("item_id", Path, description = "Attendance record ID")
    ),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Updated record, or an error envelope if the id is unknown", body = Object, example = json!({
            "metadata": { "status": "error", "message": "Item not found" }
        }))
    ),
    tag = "Presensi"
)]
#[instrument(name = "presensi_update", skip(store, path, payload), fields(item_id = *path))]
pub async fn update_presensi(
    store: web::Data<AttendanceStore>,
    path: web::Path<i64>,
    payload: web::Json<AttendanceInput>,
) -> Result<HttpResponse, PresensiError> {
    let item_id = record_id(path.into_inner())?;

    let record = store.update(item_id, payload.into_inner())?;

    info!("attendance updated");
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/presensi/{item_id}",
    params(
        ("item_id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Deleted, or an error envelope if the id is unknown", body = Object, example = json!({
            "metadata": { "status": "success", "message": "Item deleted" }
        }))
    ),
    tag = "Presensi"
)]
#[instrument(name = "presensi_delete", skip(store, path), fields(item_id = *path))]
pub async fn delete_presensi(
    store: web::Data<AttendanceStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PresensiError> {
    store.delete(record_id(path.into_inner())?)?;

    info!("attendance deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Item deleted")))
}

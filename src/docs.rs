use crate::api::attendance::PresensiQuery;
use crate::model::attendance::{AttendanceInput, AttendanceRecord, AttendanceStatus};
use crate::models::{Metadata, ResponseStatus};
use utoipa::OpenApi;
use utoipa::openapi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi API",
        version = "0.1.0",
        description = r#"
## Attendance log

Clients submit check-in (`masuk`) and check-out (`keluar`) records and query them back.
Records are kept in memory only and are lost when the server restarts.

### Response Format
Every `/presensi` response is wrapped in the same envelope, with HTTP 200 even on failure:

```json
{ "metadata": { "status": "success | empty | error", "message": "optional" }, "data": "optional" }
```

- `empty` means the query matched nothing; it is not an error.
- `createdAt` is always set by the server; `createdTime` is stored as sent.
"#,
    ),
    paths(
        crate::api::attendance::list_presensi,
        crate::api::attendance::create_presensi,
        crate::api::attendance::update_presensi,
        crate::api::attendance::delete_presensi
    ),
    components(
        schemas(
            AttendanceInput,
            AttendanceRecord,
            AttendanceStatus,
            PresensiQuery,
            Metadata,
            ResponseStatus
        )
    ),
    tags(
        (name = "Presensi", description = "Attendance check-in / check-out APIs"),
    )
)]
pub struct ApiDoc;

/// The OpenAPI document with every path mounted under `api_prefix`, matching
/// the routes registered by `routes::configure`.
pub fn openapi_for(api_prefix: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = api_prefix.trim_end_matches('/');
    if !prefix.is_empty() {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| (format!("{}{}", prefix, path), item))
            .collect();
    }
    doc
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::utils::datetime::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    /// check-in
    Masuk,
    /// check-out
    Keluar,
}

/// Payload accepted by create and update. `id` and `createdAt` are
/// server-owned, so any value sent for them is dropped.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[schema(example = "Budi")]
    pub name: String,
    #[schema(example = "budi@example.com", format = "email", value_type = String)]
    pub email: String,
    /// ISO-8601 string or unix seconds/milliseconds; echoed back as sent
    #[schema(example = "2026-01-05T08:00:00+07:00", format = "date-time", value_type = String)]
    pub created_time: Timestamp,
    #[schema(example = "Head office")]
    pub location: String,
    #[schema(example = "masuk")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "name": "Budi",
    "email": "budi@example.com",
    "createdAt": "2026-01-05T08:00:03.120331",
    "createdTime": "2026-01-05T08:00:00",
    "location": "Head office",
    "status": "masuk"
}))]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    pub name: String,
    pub email: String,
    /// set by the server on create and on every update
    #[schema(format = "date-time", value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(format = "date-time", value_type = String)]
    pub created_time: Timestamp,
    pub location: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(id: u64, input: AttendanceInput, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            created_at,
            created_time: input.created_time,
            location: input.location,
            status: input.status,
        }
    }

    /// Overlays every input field on this record and restamps `created_at`.
    /// The id never changes.
    pub fn merge(&mut self, input: AttendanceInput, now: NaiveDateTime) {
        self.name = input.name;
        self.email = input.email;
        self.created_time = input.created_time;
        self.location = input.location;
        self.status = input.status;
        self.created_at = now;
    }
}

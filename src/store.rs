use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::PresensiError;
use crate::model::attendance::{AttendanceInput, AttendanceRecord, AttendanceStatus};

#[derive(Debug)]
struct StoreState {
    records: Vec<AttendanceRecord>,
    next_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory attendance log shared by all workers.
///
/// Lives for the lifetime of the server; nothing is persisted. Ids come from
/// a counter, so they match insertion order and are never reused after a
/// delete.
#[derive(Debug, Default)]
pub struct AttendanceStore {
    state: RwLock<StoreState>,
    enforce_daily_rule: bool,
}

impl AttendanceStore {
    pub fn new(enforce_daily_rule: bool) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            enforce_daily_rule,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, PresensiError> {
        self.state
            .read()
            .map_err(|_| PresensiError::Unexpected("attendance store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, PresensiError> {
        self.state
            .write()
            .map_err(|_| PresensiError::Unexpected("attendance store lock poisoned".to_string()))
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    pub fn create(&self, input: AttendanceInput) -> Result<AttendanceRecord, PresensiError> {
        self.create_at(input, Self::now())
    }

    pub(crate) fn create_at(
        &self,
        input: AttendanceInput,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, PresensiError> {
        let mut state = self.write()?;

        if self.enforce_daily_rule {
            check_daily_rule(&state.records, &input, now.date())?;
        }

        let id = state.next_id;
        state.next_id += 1;

        let record = AttendanceRecord::new(id, input, now);
        state.records.push(record.clone());
        debug!(id, total = state.records.len(), "attendance record stored");

        Ok(record)
    }

    /// All records in store order, or only those whose email matches exactly.
    pub fn list(&self, email: Option<&str>) -> Result<Vec<AttendanceRecord>, PresensiError> {
        let state = self.read()?;
        let records = match email {
            Some(email) => state
                .records
                .iter()
                .filter(|r| r.email == email)
                .cloned()
                .collect(),
            None => state.records.clone(),
        };
        Ok(records)
    }

    /// Records whose server-side `created_at` falls on `date`.
    pub fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, PresensiError> {
        let state = self.read()?;
        Ok(state
            .records
            .iter()
            .filter(|r| r.created_at.date() == date)
            .cloned()
            .collect())
    }

    pub fn update(&self, id: u64, input: AttendanceInput) -> Result<AttendanceRecord, PresensiError> {
        self.update_at(id, input, Self::now())
    }

    pub(crate) fn update_at(
        &self,
        id: u64,
        input: AttendanceInput,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, PresensiError> {
        let mut state = self.write()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(PresensiError::item_not_found)?;

        record.merge(input, now);
        Ok(record.clone())
    }

    pub fn delete(&self, id: u64) -> Result<(), PresensiError> {
        let mut state = self.write()?;
        let index = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(PresensiError::item_not_found)?;

        state.records.remove(index);
        debug!(id, total = state.records.len(), "attendance record removed");
        Ok(())
    }

    pub fn len(&self) -> Result<usize, PresensiError> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, PresensiError> {
        Ok(self.read()?.records.is_empty())
    }
}

/// One check-in then at most one check-out per name and day.
fn check_daily_rule(
    records: &[AttendanceRecord],
    input: &AttendanceInput,
    today: NaiveDate,
) -> Result<(), PresensiError> {
    let has_today = |status: AttendanceStatus| {
        records
            .iter()
            .any(|r| r.name == input.name && r.created_at.date() == today && r.status == status)
    };
    let checked_in = has_today(AttendanceStatus::Masuk);
    let checked_out = has_today(AttendanceStatus::Keluar);

    match input.status {
        AttendanceStatus::Masuk if checked_in || checked_out => Err(PresensiError::Validation(
            "Already checked in today".to_string(),
        )),
        AttendanceStatus::Keluar if !checked_in || checked_out => Err(PresensiError::Validation(
            "No check-in found for today or already checked out today".to_string(),
        )),
        _ => Ok(()),
    }
}

//! Employee shift clock-in/out.
//!
//! At most one open shift per user; a clock-out, once written, never changes.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{auth::AuthUser, errors::ServiceError, models::EmployeeShift, store::RecordStore};

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockInRequest {
    /// Defaults to the calling user; managers may clock in someone else.
    pub user_id: Option<i64>,
}

#[derive(Clone)]
pub struct ShiftService {
    store: Arc<RecordStore>,
}

impl ShiftService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<EmployeeShift> {
        let mut shifts = self.store.shifts.all();
        shifts.sort_by(|a, b| b.id.cmp(&a.id));
        shifts
    }

    pub fn for_user(&self, user_id: i64) -> Vec<EmployeeShift> {
        let mut shifts = self.store.shifts.filter(|s| s.user_id == user_id);
        shifts.sort_by(|a, b| b.id.cmp(&a.id));
        shifts
    }

    pub fn open_shift(&self, user_id: i64) -> Option<EmployeeShift> {
        self.store
            .shifts
            .find(|s| s.user_id == user_id && s.is_active())
    }

    #[instrument(skip(self, caller), fields(caller_id = caller.user_id))]
    pub fn clock_in(
        &self,
        caller: &AuthUser,
        request: ClockInRequest,
    ) -> Result<EmployeeShift, ServiceError> {
        let user_id = request.user_id.unwrap_or(caller.user_id);
        if !caller.can_act_for(user_id) {
            return Err(ServiceError::Forbidden(
                "Cannot clock in another user".to_string(),
            ));
        }
        if self.store.users.get(user_id).is_none() {
            return Err(ServiceError::NotFound(format!("User {} not found", user_id)));
        }
        if self.open_shift(user_id).is_some() {
            return Err(ServiceError::InvalidOperation(
                "User already has an open shift".to_string(),
            ));
        }

        let shift = self.store.shifts.insert(|id| EmployeeShift {
            id,
            user_id,
            clock_in: Utc::now(),
            clock_out: None,
        });
        info!(shift_id = shift.id, user_id, "shift opened");
        Ok(shift)
    }

    #[instrument(skip(self, caller), fields(caller_id = caller.user_id))]
    pub fn clock_out(&self, caller: &AuthUser, shift_id: i64) -> Result<EmployeeShift, ServiceError> {
        let shift = self
            .store
            .shifts
            .get(shift_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Shift {} not found", shift_id)))?;

        if !caller.can_act_for(shift.user_id) {
            return Err(ServiceError::Forbidden(
                "Cannot clock out another user's shift".to_string(),
            ));
        }
        if !shift.is_active() {
            return Err(ServiceError::InvalidOperation(
                "Shift is already clocked out".to_string(),
            ));
        }

        let closed = self
            .store
            .shifts
            .update(shift_id, |s| s.clock_out = Some(Utc::now()))
            .ok_or_else(|| ServiceError::NotFound(format!("Shift {} not found", shift_id)))?;
        info!(shift_id, user_id = closed.user_id, "shift closed");
        Ok(closed)
    }
}

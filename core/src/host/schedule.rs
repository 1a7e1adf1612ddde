//! `ScheduleModule` calls: entries in the device calendar.

use serde_json::Value;

use super::HostCall;

/// Builds calls against the system calendar module. The schedule object is
/// forwarded untouched; its fields are defined by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleApi;

impl ScheduleApi {
    pub fn insert_or_update(&self, schedule: Value) -> HostCall {
        HostCall::schedule("insertOrUpdate", schedule)
    }

    pub fn delete_schedule(&self, schedule: Value) -> HostCall {
        HostCall::schedule("deleteSchedule", schedule)
    }

    pub fn query_schedule(&self, query: Value) -> HostCall {
        HostCall::schedule("querySchedule", query)
    }
}

//! Call records. Every fetched call gets its countdown recomputed against
//! the local clock, so `remaining_time` is always fresh.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;

use super::{Endpoint, Resource};
use crate::errors::ClientError;
use crate::models::{Call, CallFilter};

pub struct Calls;

impl Resource for Calls {
    const PATH: &'static str = "/api/call";
    const NAME: &'static str = "call";
    type Item = Call;

    fn after_fetch(item: &mut Call, now: DateTime<Utc>) {
        item.refresh_remaining(now);
    }
}

impl Endpoint<'_, Calls> {
    /// `GET /api/call` with status/date filters.
    pub async fn search(&self, filter: &CallFilter) -> Result<Vec<Call>, ClientError> {
        Ok(self.list_with(filter).await?.into_items())
    }

    /// `PUT /api/call/:id/complete`
    pub async fn complete(&self, id: &str) -> Result<Call, ClientError> {
        let path = format!("{}/complete", Self::item_path(id)?);
        let mut call: Call = self.client().send_empty(Method::PUT, &path).await?;
        call.refresh_remaining(Utc::now());
        Ok(call)
    }

    /// `POST /api/call/check-expired`: ask the backend to expire overdue
    /// calls. Returns the backend's summary as-is.
    pub async fn check_expired(&self) -> Result<Value, ClientError> {
        let path = format!("{}/check-expired", Calls::PATH);
        self.client().send_empty(Method::POST, &path).await
    }

    /// `GET /api/call/export` as raw spreadsheet bytes.
    pub async fn export(&self, filter: &CallFilter) -> Result<Vec<u8>, ClientError> {
        let path = format!("{}/export", Calls::PATH);
        self.client().download(&path, filter).await
    }
}

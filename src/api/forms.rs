//! Resources whose create/update go out as multipart forms because they
//! carry file attachments.

use std::path::PathBuf;

use reqwest::Method;

use super::{Endpoint, Resource};
use crate::client::FormPayload;
use crate::errors::ClientError;
use crate::models::Record;

/// Marker for resources sent as `multipart/form-data`.
pub trait FormResource: Resource<Item = Record> {}

pub struct OkForLaunch;

impl Resource for OkForLaunch {
    const PATH: &'static str = "/api/okforlunch";
    const NAME: &'static str = "OK for launch";
    type Item = Record;
}

impl FormResource for OkForLaunch {}

pub struct ValidationsForOffer;

impl Resource for ValidationsForOffer {
    const PATH: &'static str = "/api/validationforoffer";
    const NAME: &'static str = "validation for offer";
    type Item = Record;
}

impl FormResource for ValidationsForOffer {}

/// Record fields plus `(form field, file)` attachments.
pub fn build_form(record: &Record, attachments: &[(String, PathBuf)]) -> FormPayload {
    attachments
        .iter()
        .fold(FormPayload::from_json_object(record.as_map()), |form, (field, path)| {
            form.file(field.clone(), path.clone())
        })
}

impl<R: FormResource> Endpoint<'_, R> {
    pub async fn create_form(
        &self,
        record: Record,
        attachments: &[(String, PathBuf)],
    ) -> Result<Record, ClientError> {
        let record = R::before_send(record)?;
        let form = build_form(&record, attachments);
        self.client().send_form(Method::POST, R::PATH, form).await
    }

    pub async fn update_form(
        &self,
        id: &str,
        record: Record,
        attachments: &[(String, PathBuf)],
    ) -> Result<Record, ClientError> {
        let path = Self::item_path(id)?;
        let record = R::before_send(record)?;
        let form = build_form(&record, attachments);
        self.client().send_form(Method::PUT, &path, form).await
    }
}

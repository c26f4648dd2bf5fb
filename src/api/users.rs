use reqwest::Method;
use serde_json::json;

use super::{Endpoint, Resource};
use crate::errors::{ClientError, ValidationError};
use crate::models::User;

pub struct Users;

impl Resource for Users {
    const PATH: &'static str = "/api/users";
    const NAME: &'static str = "user";
    type Item = User;
}

impl Endpoint<'_, Users> {
    /// `PUT /api/users/:id/role` with `{"role": ...}`.
    pub async fn update_role(&self, id: &str, role: &str) -> Result<User, ClientError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(ValidationError::MissingField {
                field: "role".into(),
            }
            .into());
        }
        let path = format!("{}/role", Self::item_path(id)?);
        self.client()
            .send_json(Method::PUT, &path, &json!({ "role": role }))
            .await
    }
}

use serde::{Deserialize, Serialize};

use crate::services::auth::User;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    pub name: String,
    pub email: String,
    pub request_id: Option<String>,
}

impl MeResponse {
    pub fn new(user: User, request_id: Option<&str>) -> Self {
        Self {
            name: user.name,
            email: user.email,
            request_id: request_id.map(str::to_owned),
        }
    }
}

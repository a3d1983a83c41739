/*
 * Responsibility
 * - TokenChecker が解決する「認証済み主体」の型
 * - 一度組み立てたら変更しない (handler からは読むだけ)
 */
use serde::{Deserialize, Serialize};

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

pub mod checker;
pub mod factory;
pub mod service;
pub mod store;
pub mod user;

pub use checker::{CheckErrorKind, InvalidToken, TokenChecker};
pub use factory::build_auth_service;
pub use service::{AuthService, CheckFailure};
pub use user::User;

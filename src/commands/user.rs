//! User Commands
//!
//! Frontend bindings for the session's user profile.

use reqwest::Method;

use super::{ApiError, HttpApi};
use crate::models::User;

const USER_ME: &str = "api/users/me/";

impl HttpApi {
    /// Profile of the signed-in user, sensitive fields already dropped
    pub async fn fetch_current_user(&self) -> Result<User, ApiError> {
        let request = self.request(Method::GET, USER_ME)?;
        self.send_json(request).await
    }
}

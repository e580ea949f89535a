//! Notification Commands
//!
//! Frontend bindings for care-reminder endpoints.

use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, HttpApi};
use crate::models::{GardenId, Notification, NotificationId};

const NOTIFICATIONS: &str = "api/notifications/notifications/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateNotificationArgs<'a> {
    pub garden: GardenId,
    pub name: &'a str,
    pub interval: u32,
    pub next_due: NaiveDate,
    pub plant_names: &'a [String],
}

impl HttpApi {
    pub async fn fetch_notifications(&self) -> Result<Vec<Value>, ApiError> {
        let request = self.request(Method::GET, NOTIFICATIONS)?;
        self.send_json(request).await
    }

    pub async fn post_notification(
        &self,
        args: &CreateNotificationArgs<'_>,
    ) -> Result<Notification, ApiError> {
        let request = self.request(Method::POST, NOTIFICATIONS)?.json(args);
        self.send_json(request).await
    }

    pub async fn remove_notification(&self, id: NotificationId) -> Result<(), ApiError> {
        let path = format!("{}{}/", NOTIFICATIONS, id);
        let request = self.request(Method::DELETE, &path)?;
        self.send_empty(request).await
    }
}

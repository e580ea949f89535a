//! In-memory API used by loader and mutator tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, CreateGardenArgs, CreateNotificationArgs, GardenApi, UpdateGardenArgs};
use crate::models::{GardenId, Notification, NotificationId, NotificationKind, RawGarden, User};

pub struct FakeApi {
    user: Result<User, ApiError>,
    gardens: Result<Vec<RawGarden>, ApiError>,
    notifications: Result<Vec<Value>, ApiError>,
    write_error: Option<ApiError>,
    next_id: Cell<i64>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            user: Ok(User {
                id: 1,
                username: "fern".to_string(),
                first_name: "Fern".to_string(),
                last_name: String::new(),
            }),
            gardens: Ok(Vec::new()),
            notifications: Ok(Vec::new()),
            write_error: None,
            next_id: Cell::new(100),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_gardens(mut self, gardens: Vec<RawGarden>) -> Self {
        self.gardens = Ok(gardens);
        self
    }

    pub fn with_notifications(mut self, notifications: Vec<Value>) -> Self {
        self.notifications = Ok(notifications);
        self
    }

    pub fn failing_user(mut self, error: ApiError) -> Self {
        self.user = Err(error);
        self
    }

    pub fn failing_gardens(mut self, error: ApiError) -> Self {
        self.gardens = Err(error);
        self
    }

    /// Every create/update/delete fails with `error`
    pub fn failing_writes(mut self, error: ApiError) -> Self {
        self.write_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn write(&self, call: String) -> Result<(), ApiError> {
        self.record(call);
        match &self.write_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

#[async_trait(?Send)]
impl GardenApi for FakeApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.record("GET user".to_string());
        self.user.clone()
    }

    async fn list_gardens(&self) -> Result<Vec<RawGarden>, ApiError> {
        self.record("GET gardens".to_string());
        self.gardens.clone()
    }

    async fn list_notifications(&self) -> Result<Vec<Value>, ApiError> {
        self.record("GET notifications".to_string());
        self.notifications.clone()
    }

    async fn create_garden(&self, args: &CreateGardenArgs<'_>) -> Result<RawGarden, ApiError> {
        self.write(format!("POST garden {}", args.name))?;
        Ok(RawGarden {
            id: self.next_id(),
            name: args.name.to_string(),
            width: args.width,
            height: args.height,
            logs: Vec::new(),
        })
    }

    async fn update_garden(&self, id: GardenId, args: &UpdateGardenArgs<'_>) -> Result<(), ApiError> {
        self.write(format!("PUT garden {} {} {}x{}", id, args.name, args.width, args.height))
    }

    async fn delete_garden(&self, id: GardenId) -> Result<(), ApiError> {
        self.write(format!("DELETE garden {}", id))
    }

    async fn create_notification(
        &self,
        args: &CreateNotificationArgs<'_>,
    ) -> Result<Notification, ApiError> {
        self.write(format!("POST notification {}", args.name))?;
        Ok(Notification {
            id: self.next_id(),
            name: args.name.to_string(),
            interval: args.interval,
            next_due: args.next_due,
            plant_names: args.plant_names.to_vec(),
            garden: Some(args.garden),
            kind: NotificationKind::Care,
        })
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<(), ApiError> {
        self.write(format!("DELETE notification {}", id))
    }
}

//! Frontend Models
//!
//! Data structures matching backend entities, plus the normalized grid form
//! the UI renders directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type GardenId = i64;
pub type NotificationId = i64;

/// Rows of columns; `cells[row][col]`.
pub type Grid = Vec<Vec<Option<PlantedCell>>>;

/// Current user profile.
///
/// Only these fields are kept: sensitive fields the backend sends along
/// (email, zipcode) are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Plant details as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    /// Any other detail fields (spacing, sun, water, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One planted cell: log identity merged with the plant payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantedCell {
    pub log_id: i64,
    pub planted_date: NaiveDate,
    #[serde(flatten)]
    pub plant: Plant,
}

/// Server-side record of one planted cell (input to normalization only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenLog {
    pub id: i64,
    pub x_coordinate: usize,
    pub y_coordinate: usize,
    pub planted_date: NaiveDate,
    pub plant: Plant,
}

/// Garden as returned by `GET /api/gardens/gardens/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGarden {
    pub id: GardenId,
    pub name: String,
    pub width: usize,
    pub height: usize,
    #[serde(default, alias = "garden_logs")]
    pub logs: Vec<GardenLog>,
}

/// Normalized garden held in client state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    pub id: GardenId,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub cells: Grid,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Garden {
    /// A garden with an all-empty grid and no notifications
    pub fn empty(id: GardenId, name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            cells: empty_grid(width, height),
            notifications: Vec::new(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&PlantedCell> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    pub fn planted_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }
}

/// `height` rows of `width` empty cells
pub fn empty_grid(width: usize, height: usize) -> Grid {
    vec![vec![None; width]; height]
}

/// Fit a grid to new dimensions, keeping whatever still lies inside.
pub fn reshape_grid(cells: &Grid, width: usize, height: usize) -> Grid {
    (0..height)
        .map(|row| {
            (0..width)
                .map(|col| cells.get(row).and_then(|r| r.get(col)).cloned().flatten())
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Synthetic onboarding notification, never displayed
    Welcome,
    /// Recurring care reminder
    #[default]
    #[serde(other)]
    Care,
}

/// Recurring care reminder attached to one garden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub name: String,
    /// Days between reminders
    pub interval: u32,
    pub next_due: NaiveDate,
    #[serde(default)]
    pub plant_names: Vec<String>,
    /// Owning garden (foreign key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garden: Option<GardenId>,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
}

// ========================
// Action Payloads
// ========================

/// Loosely-typed garden payload; the reducer checks every field is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GardenDraft {
    pub id: Option<GardenId>,
    pub name: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

/// Fields to shallow-merge into a garden
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GardenPatch {
    pub id: Option<GardenId>,
    pub name: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub notifications: Option<Vec<Notification>>,
}

impl GardenPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn resize(width: usize, height: usize) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.notifications.is_none()
    }
}

/// Loosely-typed notification payload; every field is required by the reducer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub id: Option<NotificationId>,
    pub name: Option<String>,
    pub interval: Option<u32>,
    pub next_due: Option<NaiveDate>,
    pub plant_names: Option<Vec<String>>,
}

impl From<&Notification> for NotificationDraft {
    fn from(n: &Notification) -> Self {
        Self {
            id: Some(n.id),
            name: Some(n.name.clone()),
            interval: Some(n.interval),
            next_due: Some(n.next_due),
            plant_names: Some(n.plant_names.clone()),
        }
    }
}

/// Fields to shallow-merge into a notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPatch {
    pub id: Option<NotificationId>,
    pub name: Option<String>,
    pub interval: Option<u32>,
    pub next_due: Option<NaiveDate>,
    pub plant_names: Option<Vec<String>>,
}

impl NotificationPatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.interval.is_none()
            && self.next_due.is_none()
            && self.plant_names.is_none()
    }
}

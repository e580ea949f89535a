//! Response Formatting
//!
//! Turns relational server responses into the denormalized shapes held in
//! the store: log rows become grid cells, grouped notifications become
//! per-garden lists. Inputs are borrowed and never modified.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::models::{
    empty_grid, Garden, GardenId, Grid, Notification, NotificationKind, PlantedCell, RawGarden,
};

/// Build the `height × width` grid for one garden from its log rows.
///
/// Two logs on the same coordinate: the later one wins. Rows outside the
/// grid are skipped.
pub fn format_grid(raw: &RawGarden) -> Grid {
    let mut cells = empty_grid(raw.width, raw.height);

    for log in &raw.logs {
        let (row, col) = (log.y_coordinate, log.x_coordinate);
        let Some(slot) = cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
            tracing::warn!(
                garden = raw.id,
                log = log.id,
                row,
                col,
                width = raw.width,
                height = raw.height,
                "garden log outside grid, skipped"
            );
            continue;
        };

        if let Some(previous) = slot.as_ref() {
            tracing::warn!(
                garden = raw.id,
                row,
                col,
                overwritten = previous.log_id,
                by = log.id,
                "duplicate garden log coordinate"
            );
        }

        *slot = Some(PlantedCell {
            log_id: log.id,
            planted_date: log.planted_date,
            plant: log.plant.clone(),
        });
    }

    cells
}

/// Normalize one garden, attaching its notification list.
pub fn format_garden(raw: &RawGarden, notifications: Vec<Notification>) -> Garden {
    Garden {
        id: raw.id,
        name: raw.name.clone(),
        width: raw.width,
        height: raw.height,
        cells: format_grid(raw),
        notifications,
    }
}

/// Normalize every garden, keeping server order.
pub fn format_gardens(raw: &[RawGarden], notifications: &NotificationIndex) -> Vec<Garden> {
    raw.iter()
        .map(|g| format_garden(g, notifications.for_garden(g.id)))
        .collect()
}

// ========================
// Notifications
// ========================

/// Displayable notifications keyed by owning garden
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationIndex {
    by_garden: HashMap<GardenId, Vec<Notification>>,
}

impl NotificationIndex {
    /// Empty list for gardens that have none.
    pub fn for_garden(&self, garden: GardenId) -> Vec<Notification> {
        self.by_garden.get(&garden).cloned().unwrap_or_default()
    }

    pub fn garden_count(&self) -> usize {
        self.by_garden.len()
    }

    fn insert(&mut self, garden: GardenId, notification: Notification) {
        let list = self.by_garden.entry(garden).or_default();
        if list.iter().any(|n| n.id == notification.id) {
            tracing::debug!(garden, notification = notification.id, "duplicate notification dropped");
            return;
        }
        list.push(notification);
    }
}

#[derive(Deserialize)]
struct NotificationGroup {
    garden: GardenId,
    #[serde(default)]
    notifications: Vec<Value>,
}

/// Index the notifications response by garden.
///
/// Accepts `{ garden, notifications: [...] }` groups, and bare notifications
/// carrying a `garden` key. Anything else is skipped; this never fails.
pub fn format_notifications(groups: &[Value]) -> NotificationIndex {
    let mut index = NotificationIndex::default();

    for group in groups {
        if group.get("notifications").is_some() {
            match NotificationGroup::deserialize(group) {
                Ok(g) => {
                    for item in &g.notifications {
                        if let Some(mut n) = parse_notification(item) {
                            n.garden = Some(g.garden);
                            index.insert(g.garden, n);
                        }
                    }
                }
                Err(e) => tracing::debug!(error = %e, "malformed notification group skipped"),
            }
            continue;
        }

        if let Some(n) = parse_notification(group) {
            match n.garden {
                Some(garden) => index.insert(garden, n),
                None => tracing::debug!(notification = n.id, "notification without garden skipped"),
            }
        }
    }

    index
}

/// `None` for malformed entries and welcome notifications
fn parse_notification(value: &Value) -> Option<Notification> {
    let notification = match Notification::deserialize(value) {
        Ok(n) => n,
        Err(e) => {
            tracing::debug!(error = %e, "malformed notification skipped");
            return None;
        }
    };
    if notification.kind == NotificationKind::Welcome {
        return None;
    }
    Some(notification)
}

//! Garden Reducer
//!
//! Pure state transitions over the garden collection. Every action is
//! validated before anything changes; a rejected action leaves the state
//! exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    reshape_grid, Garden, GardenDraft, GardenId, GardenPatch, Notification, NotificationDraft,
    NotificationId, NotificationKind, NotificationPatch,
};

/// The garden collection. Order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GardensState {
    /// Nothing fetched yet
    #[default]
    Uninitialized,
    Populated(Vec<Garden>),
}

impl GardensState {
    /// Empty until populated.
    pub fn gardens(&self) -> &[Garden] {
        match self {
            GardensState::Uninitialized => &[],
            GardensState::Populated(gardens) => gardens,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, GardensState::Populated(_))
    }

    /// Index of the garden with this id
    pub fn position(&self, id: GardenId) -> Option<usize> {
        self.gardens().iter().position(|g| g.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GardenAction {
    /// One-time seed from fetched data
    Populate(Vec<Garden>),
    /// Insert at `index`, or at the front when `None`
    AddGarden {
        draft: GardenDraft,
        index: Option<usize>,
    },
    RemoveGarden {
        index: usize,
    },
    UpdateGarden {
        index: usize,
        patch: GardenPatch,
    },
    AddNotification {
        garden_index: usize,
        draft: NotificationDraft,
    },
    RemoveNotification {
        garden_index: usize,
        notification_id: NotificationId,
    },
    UpdateNotification {
        garden_index: usize,
        notification_id: NotificationId,
        patch: NotificationPatch,
    },
    /// Replace a garden's notification list
    UpdateNotifications {
        garden_index: usize,
        notifications: Vec<Notification>,
    },
    /// Replace the whole collection (rollback of an optimistic update)
    Restore(GardensState),
}

impl GardenAction {
    pub fn name(&self) -> &'static str {
        match self {
            GardenAction::Populate(_) => "Populate",
            GardenAction::AddGarden { .. } => "AddGarden",
            GardenAction::RemoveGarden { .. } => "RemoveGarden",
            GardenAction::UpdateGarden { .. } => "UpdateGarden",
            GardenAction::AddNotification { .. } => "AddNotification",
            GardenAction::RemoveNotification { .. } => "RemoveNotification",
            GardenAction::UpdateNotification { .. } => "UpdateNotification",
            GardenAction::UpdateNotifications { .. } => "UpdateNotifications",
            GardenAction::Restore(_) => "Restore",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    #[error("gardens are already populated")]
    AlreadyPopulated,
    #[error("gardens are not populated yet")]
    NotPopulated,
    #[error("garden index {index} out of bounds (len {len})")]
    GardenIndex { index: usize, len: usize },
    #[error("{action} payload is missing `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },
    #[error("{0} payload is empty")]
    EmptyPayload(&'static str),
    #[error("notification {0} not found")]
    NotificationNotFound(NotificationId),
}

/// Injected reducer behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerOptions {
    /// Report rejected actions through `tracing`
    pub debug: bool,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            debug: cfg!(debug_assertions),
        }
    }
}

/// Compute the next state. `state` is never modified.
pub fn reduce(state: &GardensState, action: GardenAction) -> Result<GardensState, ReducerError> {
    match action {
        GardenAction::Populate(gardens) => match state {
            GardensState::Uninitialized => Ok(GardensState::Populated(gardens)),
            GardensState::Populated(_) => Err(ReducerError::AlreadyPopulated),
        },
        GardenAction::Restore(snapshot) => Ok(snapshot),
        GardenAction::AddGarden { draft, index } => {
            let mut gardens = populated(state)?;
            let garden = garden_from_draft(draft)?;
            let index = index.unwrap_or(0);
            if index > gardens.len() {
                return Err(ReducerError::GardenIndex { index, len: gardens.len() });
            }
            gardens.insert(index, garden);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::RemoveGarden { index } => {
            let mut gardens = populated(state)?;
            check_index(&gardens, index)?;
            gardens.remove(index);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::UpdateGarden { index, patch } => {
            let mut gardens = populated(state)?;
            if patch.is_empty() {
                return Err(ReducerError::EmptyPayload("UpdateGarden"));
            }
            merge_garden(garden_mut(&mut gardens, index)?, patch);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::AddNotification { garden_index, draft } => {
            let mut gardens = populated(state)?;
            let garden = garden_mut(&mut gardens, garden_index)?;
            let notification = notification_from_draft(draft, garden.id)?;
            garden.notifications.push(notification);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::RemoveNotification { garden_index, notification_id } => {
            let mut gardens = populated(state)?;
            let garden = garden_mut(&mut gardens, garden_index)?;
            if !garden.notifications.iter().any(|n| n.id == notification_id) {
                return Err(ReducerError::NotificationNotFound(notification_id));
            }
            garden.notifications.retain(|n| n.id != notification_id);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::UpdateNotification { garden_index, notification_id, patch } => {
            let mut gardens = populated(state)?;
            if patch.is_empty() {
                return Err(ReducerError::EmptyPayload("UpdateNotification"));
            }
            let notification = garden_mut(&mut gardens, garden_index)?
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
                .ok_or(ReducerError::NotificationNotFound(notification_id))?;
            merge_notification(notification, patch);
            Ok(GardensState::Populated(gardens))
        }
        GardenAction::UpdateNotifications { garden_index, notifications } => {
            let mut gardens = populated(state)?;
            if notifications.is_empty() {
                return Err(ReducerError::EmptyPayload("UpdateNotifications"));
            }
            garden_mut(&mut gardens, garden_index)?.notifications = notifications;
            Ok(GardensState::Populated(gardens))
        }
    }
}

/// Apply `action` to the state in place of the old snapshot.
///
/// A rejected action leaves `state` untouched; the error is logged when
/// `options.debug` is set and handed back for callers that care.
pub fn dispatch(
    state: &mut GardensState,
    action: GardenAction,
    options: &ReducerOptions,
) -> Result<(), ReducerError> {
    let name = action.name();
    match reduce(state, action) {
        Ok(next) => {
            *state = next;
            Ok(())
        }
        Err(e) => {
            if options.debug {
                tracing::warn!(action = name, error = %e, "action rejected");
            }
            Err(e)
        }
    }
}

fn populated(state: &GardensState) -> Result<Vec<Garden>, ReducerError> {
    match state {
        GardensState::Uninitialized => Err(ReducerError::NotPopulated),
        GardensState::Populated(gardens) => Ok(gardens.clone()),
    }
}

fn check_index(gardens: &[Garden], index: usize) -> Result<(), ReducerError> {
    if index < gardens.len() {
        Ok(())
    } else {
        Err(ReducerError::GardenIndex { index, len: gardens.len() })
    }
}

fn garden_mut(gardens: &mut [Garden], index: usize) -> Result<&mut Garden, ReducerError> {
    let len = gardens.len();
    gardens
        .get_mut(index)
        .ok_or(ReducerError::GardenIndex { index, len })
}

fn garden_from_draft(draft: GardenDraft) -> Result<Garden, ReducerError> {
    let missing = |field: &'static str| ReducerError::MissingField { action: "AddGarden", field };
    let id = draft.id.ok_or_else(|| missing("id"))?;
    let name = draft.name.ok_or_else(|| missing("name"))?;
    let width = draft.width.ok_or_else(|| missing("width"))?;
    let height = draft.height.ok_or_else(|| missing("height"))?;
    Ok(Garden::empty(id, name, width, height))
}

fn notification_from_draft(
    draft: NotificationDraft,
    garden: GardenId,
) -> Result<Notification, ReducerError> {
    let missing = |field: &'static str| ReducerError::MissingField { action: "AddNotification", field };
    Ok(Notification {
        id: draft.id.ok_or_else(|| missing("id"))?,
        name: draft.name.ok_or_else(|| missing("name"))?,
        interval: draft.interval.ok_or_else(|| missing("interval"))?,
        next_due: draft.next_due.ok_or_else(|| missing("next_due"))?,
        plant_names: draft.plant_names.ok_or_else(|| missing("plant_names"))?,
        garden: Some(garden),
        kind: NotificationKind::Care,
    })
}

/// Shallow merge; the grid follows any change of dimensions.
fn merge_garden(garden: &mut Garden, patch: GardenPatch) {
    let previous_id = garden.id;
    if let Some(id) = patch.id {
        garden.id = id;
    }
    if let Some(name) = patch.name {
        garden.name = name;
    }

    let width = patch.width.unwrap_or(garden.width);
    let height = patch.height.unwrap_or(garden.height);
    if (width, height) != (garden.width, garden.height) {
        let before = garden.planted_count();
        garden.cells = reshape_grid(&garden.cells, width, height);
        garden.width = width;
        garden.height = height;
        let dropped = before - garden.planted_count();
        if dropped > 0 {
            tracing::debug!(garden = garden.id, dropped, "resize removed planted cells");
        }
    }

    if let Some(notifications) = patch.notifications {
        garden.notifications = notifications;
    }

    if garden.id != previous_id {
        for notification in &mut garden.notifications {
            if notification.garden == Some(previous_id) {
                notification.garden = Some(garden.id);
            }
        }
    }
}

fn merge_notification(notification: &mut Notification, patch: NotificationPatch) {
    if let Some(id) = patch.id {
        notification.id = id;
    }
    if let Some(name) = patch.name {
        notification.name = name;
    }
    if let Some(interval) = patch.interval {
        notification.interval = interval;
    }
    if let Some(next_due) = patch.next_due {
        notification.next_due = next_due;
    }
    if let Some(plant_names) = patch.plant_names {
        notification.plant_names = plant_names;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlantedCell, Plant};
    use chrono::NaiveDate;
    use serde_json::Map;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn notification(id: NotificationId, name: &str) -> Notification {
        Notification {
            id,
            name: name.to_string(),
            interval: 3,
            next_due: date(1),
            plant_names: vec!["Kale".to_string()],
            garden: Some(1),
            kind: NotificationKind::Care,
        }
    }

    fn populated_with(ids: &[GardenId]) -> GardensState {
        GardensState::Populated(
            ids.iter()
                .map(|&id| Garden::empty(id, format!("Garden {}", id), 2, 2))
                .collect(),
        )
    }

    fn ids(state: &GardensState) -> Vec<GardenId> {
        state.gardens().iter().map(|g| g.id).collect()
    }

    fn full_draft(id: NotificationId) -> NotificationDraft {
        NotificationDraft {
            id: Some(id),
            name: Some("Water".to_string()),
            interval: Some(2),
            next_due: Some(date(3)),
            plant_names: Some(vec!["Leek".to_string()]),
        }
    }

    #[test]
    fn test_populate_once() {
        let state = GardensState::default();
        let first = reduce(&state, GardenAction::Populate(vec![Garden::empty(1, "A", 1, 1)])).unwrap();
        assert_eq!(ids(&first), vec![1]);

        let second = reduce(&first, GardenAction::Populate(vec![Garden::empty(2, "B", 1, 1)]));
        assert_eq!(second, Err(ReducerError::AlreadyPopulated));
    }

    #[test]
    fn test_dispatch_keeps_state_on_second_populate() {
        let mut state = populated_with(&[1]);
        let before = state.clone();
        let result = dispatch(&mut state, GardenAction::Populate(Vec::new()), &ReducerOptions { debug: true });
        assert_eq!(result, Err(ReducerError::AlreadyPopulated));
        assert_eq!(state, before);
    }

    #[test]
    fn test_mutations_require_populated() {
        let state = GardensState::Uninitialized;
        assert_eq!(
            reduce(&state, GardenAction::RemoveGarden { index: 0 }),
            Err(ReducerError::NotPopulated)
        );
    }

    #[test]
    fn test_add_garden_prepends_by_default() {
        let state = populated_with(&[1, 2]);
        let draft = GardenDraft {
            id: Some(3),
            name: Some("Herbs".to_string()),
            width: Some(3),
            height: Some(2),
        };
        let next = reduce(&state, GardenAction::AddGarden { draft: draft.clone(), index: None }).unwrap();
        assert_eq!(ids(&next), vec![3, 1, 2]);
        assert_eq!(next.gardens()[0].cells.len(), 2);
        assert_eq!(next.gardens()[0].cells[0].len(), 3);

        let at_end = reduce(&state, GardenAction::AddGarden { draft, index: Some(2) }).unwrap();
        assert_eq!(ids(&at_end), vec![1, 2, 3]);
    }

    #[test]
    fn test_add_garden_missing_field_rejected() {
        let state = populated_with(&[1]);
        let draft = GardenDraft {
            id: Some(3),
            name: Some("Herbs".to_string()),
            width: Some(3),
            height: None,
        };
        assert_eq!(
            reduce(&state, GardenAction::AddGarden { draft, index: None }),
            Err(ReducerError::MissingField { action: "AddGarden", field: "height" })
        );
    }

    #[test]
    fn test_add_garden_index_past_end_rejected() {
        let state = populated_with(&[1]);
        let draft = GardenDraft {
            id: Some(3),
            name: Some("Herbs".to_string()),
            width: Some(1),
            height: Some(1),
        };
        assert_eq!(
            reduce(&state, GardenAction::AddGarden { draft, index: Some(5) }),
            Err(ReducerError::GardenIndex { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_remove_garden_keeps_order() {
        let state = populated_with(&[1, 2, 3, 4]);
        let next = reduce(&state, GardenAction::RemoveGarden { index: 1 }).unwrap();
        assert_eq!(ids(&next), vec![1, 3, 4]);
        // the input snapshot is untouched
        assert_eq!(ids(&state), vec![1, 2, 3, 4]);

        assert_eq!(
            reduce(&state, GardenAction::RemoveGarden { index: 4 }),
            Err(ReducerError::GardenIndex { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_update_garden_shallow_merge() {
        let mut state = populated_with(&[1, 2]);
        if let GardensState::Populated(gardens) = &mut state {
            gardens[0].notifications.push(notification(5, "Water"));
        }
        let next = reduce(
            &state,
            GardenAction::UpdateGarden { index: 0, patch: GardenPatch::rename("Front bed") },
        )
        .unwrap();

        let updated = &next.gardens()[0];
        let original = &state.gardens()[0];
        assert_eq!(updated.name, "Front bed");
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.width, original.width);
        assert_eq!(updated.height, original.height);
        assert_eq!(updated.cells, original.cells);
        assert_eq!(updated.notifications, original.notifications);
        assert_eq!(next.gardens()[1], state.gardens()[1]);
    }

    #[test]
    fn test_update_garden_new_id_follows_into_notifications() {
        let mut state = populated_with(&[-1, 2]);
        if let GardensState::Populated(gardens) = &mut state {
            let mut pending = notification(5, "Water");
            pending.garden = Some(-1);
            gardens[0].notifications.push(pending);
        }
        let patch = GardenPatch { id: Some(40), ..GardenPatch::default() };
        let next = reduce(&state, GardenAction::UpdateGarden { index: 0, patch }).unwrap();

        let garden = &next.gardens()[0];
        assert_eq!(garden.id, 40);
        assert_eq!(garden.notifications[0].garden, Some(40));
    }

    #[test]
    fn test_update_garden_resize_reshapes_grid() {
        let mut state = populated_with(&[1]);
        if let GardensState::Populated(gardens) = &mut state {
            gardens[0].cells[0][0] = Some(PlantedCell {
                log_id: 1,
                planted_date: date(1),
                plant: Plant { id: 1, name: "Rose".to_string(), details: Map::new() },
            });
        }
        let next = reduce(&state, GardenAction::UpdateGarden { index: 0, patch: GardenPatch::resize(4, 1) }).unwrap();
        let garden = &next.gardens()[0];
        assert_eq!((garden.width, garden.height), (4, 1));
        assert_eq!(garden.cells.len(), 1);
        assert_eq!(garden.cells[0].len(), 4);
        assert_eq!(garden.cell(0, 0).unwrap().plant.name, "Rose");
    }

    #[test]
    fn test_update_garden_empty_patch_rejected() {
        let state = populated_with(&[1]);
        assert_eq!(
            reduce(&state, GardenAction::UpdateGarden { index: 0, patch: GardenPatch::default() }),
            Err(ReducerError::EmptyPayload("UpdateGarden"))
        );
    }

    #[test]
    fn test_add_notification_appends() {
        let state = populated_with(&[1, 2]);
        let next = reduce(&state, GardenAction::AddNotification { garden_index: 1, draft: full_draft(8) }).unwrap();
        let added = &next.gardens()[1].notifications;
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, 8);
        assert_eq!(added[0].garden, Some(2));
        assert!(next.gardens()[0].notifications.is_empty());
    }

    #[test]
    fn test_add_notification_missing_interval_leaves_state() {
        let mut state = populated_with(&[1]);
        let before = state.clone();
        let draft = NotificationDraft { interval: None, ..full_draft(8) };

        let result = dispatch(
            &mut state,
            GardenAction::AddNotification { garden_index: 0, draft },
            &ReducerOptions { debug: true },
        );

        assert_eq!(
            result,
            Err(ReducerError::MissingField { action: "AddNotification", field: "interval" })
        );
        assert_eq!(state, before);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    struct CapturedLogsGuard {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogsGuard;

        fn make_writer(&'a self) -> Self::Writer {
            CapturedLogsGuard { buffer: self.buffer.clone() }
        }
    }

    impl Write for CapturedLogsGuard {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Dispatch an AddNotification without `interval` and return what was logged.
    fn logs_for_missing_interval(debug: bool) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .finish();

        let mut state = populated_with(&[1]);
        let before = state.clone();
        let draft = NotificationDraft { interval: None, ..full_draft(8) };
        let result = tracing::subscriber::with_default(subscriber, || {
            dispatch(
                &mut state,
                GardenAction::AddNotification { garden_index: 0, draft },
                &ReducerOptions { debug },
            )
        });
        assert!(result.is_err());
        assert_eq!(state, before);

        let bytes = logs.buffer.lock().expect("log buffer").clone();
        String::from_utf8(bytes).expect("utf8 logs")
    }

    #[test]
    fn test_rejected_action_logged_in_debug() {
        let logs = logs_for_missing_interval(true);
        assert!(logs.contains("action rejected"));
        assert!(logs.contains("AddNotification"));
        assert!(logs.contains("interval"));
    }

    #[test]
    fn test_rejected_action_silent_without_debug() {
        assert_eq!(logs_for_missing_interval(false), "");
    }

    #[test]
    fn test_remove_notification() {
        let mut state = populated_with(&[1]);
        if let GardensState::Populated(gardens) = &mut state {
            gardens[0].notifications = vec![notification(1, "Water"), notification(2, "Prune")];
        }
        let next = reduce(&state, GardenAction::RemoveNotification { garden_index: 0, notification_id: 1 }).unwrap();
        assert_eq!(next.gardens()[0].notifications, vec![notification(2, "Prune")]);

        assert_eq!(
            reduce(&state, GardenAction::RemoveNotification { garden_index: 0, notification_id: 9 }),
            Err(ReducerError::NotificationNotFound(9))
        );
    }

    #[test]
    fn test_update_notification_merges() {
        let mut state = populated_with(&[1]);
        if let GardensState::Populated(gardens) = &mut state {
            gardens[0].notifications = vec![notification(1, "Water")];
        }
        let patch = NotificationPatch { next_due: Some(date(9)), ..Default::default() };
        let next = reduce(
            &state,
            GardenAction::UpdateNotification { garden_index: 0, notification_id: 1, patch },
        )
        .unwrap();

        let updated = &next.gardens()[0].notifications[0];
        assert_eq!(updated.next_due, date(9));
        assert_eq!(updated.name, "Water");
        assert_eq!(updated.interval, 3);
    }

    #[test]
    fn test_update_notifications_replaces_list() {
        let state = populated_with(&[1]);
        let list = vec![notification(3, "Harvest"), notification(4, "Mulch")];
        let next = reduce(
            &state,
            GardenAction::UpdateNotifications { garden_index: 0, notifications: list.clone() },
        )
        .unwrap();
        assert_eq!(next.gardens()[0].notifications, list);

        assert_eq!(
            reduce(&state, GardenAction::UpdateNotifications { garden_index: 0, notifications: Vec::new() }),
            Err(ReducerError::EmptyPayload("UpdateNotifications"))
        );
    }

    #[test]
    fn test_restore_replaces_everything() {
        let state = populated_with(&[1, 2]);
        let snapshot = populated_with(&[7]);
        let next = reduce(&state, GardenAction::Restore(snapshot.clone())).unwrap();
        assert_eq!(next, snapshot);
        assert_eq!(next.position(7), Some(0));
    }
}

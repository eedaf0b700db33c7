//! Dialog workflow over the pending-action slot.
//!
//! The slot is a single `Option<PendingAction<R>>` owned by the table state.
//! These functions are the only code that consumes it:
//!
//! - [`react`] runs after every state change. A pending link fires its
//!   `on_click` once and the slot is emptied; dialog actions stay in the slot
//!   and show as an open dialog.
//! - [`confirm`] and [`cancel`] close an open dialog, running exactly one of
//!   `on_confirm` / `on_cancel`.
//!
//! The action is taken out of the slot before any callback runs, so a
//! callback that panics never leaves a dialog stuck open.

use super::action::{PendingAction, RowAction};
use log::debug;

/// Where the dialog workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Nothing pending.
    Idle,
    /// A link was set and has not been reacted to yet.
    LinkPending,
    /// A confirmation dialog is open.
    ConfirmationOpen,
    /// A custom dialog is open.
    CustomOpen,
}

/// Text content of the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    /// Title line.
    pub title: String,
    /// Description or custom content.
    pub body: String,
    /// Confirm button label.
    pub confirmation_text: String,
    /// Cancel button label.
    pub cancel_text: String,
}

/// The workflow state implied by the slot.
pub fn state_of<R>(slot: &Option<PendingAction<R>>) -> DialogState {
    match slot.as_ref().map(|p| &p.action) {
        None => DialogState::Idle,
        Some(RowAction::Link(_)) => DialogState::LinkPending,
        Some(RowAction::ConfirmationDialog(_)) => DialogState::ConfirmationOpen,
        Some(RowAction::CustomDialog(_)) => DialogState::CustomOpen,
    }
}

/// Reacts to the current slot. Fires a pending link and clears it.
///
/// Returns whether a link fired.
pub fn react<R>(slot: &mut Option<PendingAction<R>>) -> bool {
    if state_of(slot) != DialogState::LinkPending {
        return false;
    }
    let Some(pending) = slot.take() else {
        return false;
    };
    if let RowAction::Link(link) = &pending.action {
        debug!("firing link `{}` for row {}", link.label, pending.row_index);
        (link.on_click)(&pending.row);
    }
    true
}

/// Confirms the open dialog: runs `on_confirm` and clears the slot.
///
/// Returns `false` when no dialog is open.
pub fn confirm<R>(slot: &mut Option<PendingAction<R>>) -> bool {
    if !is_dialog_open(slot) {
        return false;
    }
    let Some(pending) = slot.take() else {
        return false;
    };
    debug!("dialog confirmed for row {}", pending.row_index);
    match &pending.action {
        RowAction::ConfirmationDialog(d) => (d.on_confirm)(&pending.row),
        RowAction::CustomDialog(d) => (d.on_confirm)(&pending.row),
        RowAction::Link(_) => {}
    }
    true
}

/// Cancels the open dialog: runs `on_cancel` if set and clears the slot.
///
/// Returns `false` when no dialog is open.
pub fn cancel<R>(slot: &mut Option<PendingAction<R>>) -> bool {
    if !is_dialog_open(slot) {
        return false;
    }
    let Some(pending) = slot.take() else {
        return false;
    };
    debug!("dialog cancelled for row {}", pending.row_index);
    let on_cancel = match &pending.action {
        RowAction::ConfirmationDialog(d) => d.on_cancel.as_ref(),
        RowAction::CustomDialog(d) => d.on_cancel.as_ref(),
        RowAction::Link(_) => None,
    };
    if let Some(on_cancel) = on_cancel {
        on_cancel(&pending.row);
    }
    true
}

/// Whether a confirmation or custom dialog is open.
pub fn is_dialog_open<R>(slot: &Option<PendingAction<R>>) -> bool {
    matches!(
        state_of(slot),
        DialogState::ConfirmationOpen | DialogState::CustomOpen
    )
}

/// Text of the open dialog, if any.
pub fn dialog_view<R>(slot: &Option<PendingAction<R>>) -> Option<DialogView> {
    let pending = slot.as_ref()?;
    match &pending.action {
        RowAction::Link(_) => None,
        RowAction::ConfirmationDialog(d) => Some(DialogView {
            title: d.title.clone(),
            body: d.description.clone(),
            confirmation_text: d.confirmation_text.clone(),
            cancel_text: d.cancel_text.clone(),
        }),
        RowAction::CustomDialog(d) => Some(DialogView {
            title: d.title.clone(),
            body: (d.content)(&pending.row),
            confirmation_text: d.confirmation_text.clone(),
            cancel_text: d.cancel_text.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn pending(action: RowAction<String>) -> Option<PendingAction<String>> {
        Some(PendingAction {
            action,
            row: "r1".to_string(),
            row_index: 0,
        })
    }

    fn recorder(log: &Log, tag: &'static str) -> impl Fn(&String) + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |row: &String| log.lock().unwrap().push(format!("{tag}:{row}"))
    }

    #[test]
    fn test_link_fires_once_and_clears() {
        let log: Log = Arc::default();
        let mut slot = pending(RowAction::link("Open", recorder(&log, "click")));
        assert_eq!(state_of(&slot), DialogState::LinkPending);

        assert!(react(&mut slot));
        assert!(slot.is_none());
        assert!(!react(&mut slot));
        assert_eq!(*log.lock().unwrap(), vec!["click:r1"]);
    }

    #[test]
    fn test_react_leaves_dialogs_open() {
        let log: Log = Arc::default();
        let mut slot = pending(RowAction::confirm("Del", "Delete", "Sure?", recorder(&log, "ok")));
        assert!(!react(&mut slot));
        assert_eq!(state_of(&slot), DialogState::ConfirmationOpen);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_runs_only_on_confirm() {
        let log: Log = Arc::default();
        let action = RowAction::confirm("Del", "Delete", "Sure?", recorder(&log, "ok"))
            .with_on_cancel(recorder(&log, "cancel"));
        let mut slot = pending(action);
        assert!(confirm(&mut slot));
        assert!(!cancel(&mut slot));
        assert_eq!(state_of(&slot), DialogState::Idle);
        assert_eq!(*log.lock().unwrap(), vec!["ok:r1"]);
    }

    #[test]
    fn test_cancel_without_callback_still_closes() {
        let log: Log = Arc::default();
        let mut slot = pending(RowAction::custom(
            "Edit",
            "Edit row",
            |r: &String| format!("editing {r}"),
            recorder(&log, "save"),
        ));
        assert_eq!(state_of(&slot), DialogState::CustomOpen);
        assert!(cancel(&mut slot));
        assert!(slot.is_none());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dialog_view_renders_custom_content() {
        let slot = pending(RowAction::custom(
            "Edit",
            "Edit row",
            |r: &String| format!("editing {r}"),
            |_: &String| {},
        ));
        let view = dialog_view(&slot).unwrap();
        assert_eq!(view.title, "Edit row");
        assert_eq!(view.body, "editing r1");
        assert_eq!(view.confirmation_text, "Save");
    }

    #[test]
    fn test_panicking_confirm_still_clears() {
        let mut slot = pending(RowAction::confirm("Del", "t", "d", |_: &String| {
            panic!("caller failure")
        }));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| confirm(&mut slot)));
        assert!(result.is_err());
        assert!(slot.is_none());
    }
}

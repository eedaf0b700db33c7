//! Row action descriptors and the cell action dispatcher.
//!
//! A cell that offers actions never performs them. Activating an action only
//! records a [`PendingAction`] in the table state; the dialog controller
//! reacts to that slot and decides whether to fire a callback right away
//! (links) or open a dialog first.

use std::fmt;
use std::sync::Arc;

/// Callback invoked with the row an action targets.
pub type RowCallback<R> = Arc<dyn Fn(&R) + Send + Sync>;

/// Produces dialog body text for a row.
pub type ContentRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Discriminant of a row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// Fires `on_click` immediately.
    Link,
    /// Opens a yes/no confirmation dialog.
    ConfirmationDialog,
    /// Opens a dialog with caller-rendered content.
    CustomDialog,
}

/// Fires a callback without confirmation, e.g. navigation.
pub struct LinkAction<R> {
    /// Button label.
    pub label: String,
    /// Called once per activation.
    pub on_click: RowCallback<R>,
}

/// Asks for confirmation before running `on_confirm`.
pub struct ConfirmationDialog<R> {
    /// Button label.
    pub label: String,
    /// Dialog title.
    pub title: String,
    /// Dialog description.
    pub description: String,
    /// Label of the confirm button.
    pub confirmation_text: String,
    /// Label of the cancel button.
    pub cancel_text: String,
    /// Called when the dialog is confirmed.
    pub on_confirm: RowCallback<R>,
    /// Called when the dialog is cancelled or dismissed.
    pub on_cancel: Option<RowCallback<R>>,
}

/// A dialog whose body the caller renders.
pub struct CustomDialog<R> {
    /// Button label.
    pub label: String,
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub content: ContentRenderer<R>,
    /// Label of the confirm button.
    pub confirmation_text: String,
    /// Label of the cancel button.
    pub cancel_text: String,
    /// Called when the dialog is confirmed.
    pub on_confirm: RowCallback<R>,
    /// Called when the dialog is cancelled or dismissed.
    pub on_cancel: Option<RowCallback<R>>,
}

/// An action a user can trigger on a row.
pub enum RowAction<R> {
    /// See [`LinkAction`].
    Link(LinkAction<R>),
    /// See [`ConfirmationDialog`].
    ConfirmationDialog(ConfirmationDialog<R>),
    /// See [`CustomDialog`].
    CustomDialog(CustomDialog<R>),
}

impl<R> RowAction<R> {
    /// A link action.
    pub fn link<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        RowAction::Link(LinkAction {
            label: label.into(),
            on_click: Arc::new(on_click),
        })
    }

    /// A confirmation dialog action with "Confirm"/"Cancel" buttons.
    pub fn confirm<F>(
        label: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        on_confirm: F,
    ) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        RowAction::ConfirmationDialog(ConfirmationDialog {
            label: label.into(),
            title: title.into(),
            description: description.into(),
            confirmation_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            on_confirm: Arc::new(on_confirm),
            on_cancel: None,
        })
    }

    /// A custom dialog action with "Save"/"Cancel" buttons.
    pub fn custom<C, F>(
        label: impl Into<String>,
        title: impl Into<String>,
        content: C,
        on_confirm: F,
    ) -> Self
    where
        C: Fn(&R) -> String + Send + Sync + 'static,
        F: Fn(&R) + Send + Sync + 'static,
    {
        RowAction::CustomDialog(CustomDialog {
            label: label.into(),
            title: title.into(),
            content: Arc::new(content),
            confirmation_text: "Save".to_string(),
            cancel_text: "Cancel".to_string(),
            on_confirm: Arc::new(on_confirm),
            on_cancel: None,
        })
    }

    /// Sets the cancel callback of a dialog action. No effect on links.
    pub fn with_on_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        match &mut self {
            RowAction::Link(_) => {}
            RowAction::ConfirmationDialog(d) => d.on_cancel = Some(Arc::new(on_cancel)),
            RowAction::CustomDialog(d) => d.on_cancel = Some(Arc::new(on_cancel)),
        }
        self
    }

    /// Sets the button labels of a dialog action. No effect on links.
    pub fn with_button_text(
        mut self,
        confirmation_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        let (ok, cancel) = (confirmation_text.into(), cancel_text.into());
        match &mut self {
            RowAction::Link(_) => {}
            RowAction::ConfirmationDialog(d) => {
                d.confirmation_text = ok;
                d.cancel_text = cancel;
            }
            RowAction::CustomDialog(d) => {
                d.confirmation_text = ok;
                d.cancel_text = cancel;
            }
        }
        self
    }

    /// The action's discriminant.
    pub fn action_type(&self) -> ActionType {
        match self {
            RowAction::Link(_) => ActionType::Link,
            RowAction::ConfirmationDialog(_) => ActionType::ConfirmationDialog,
            RowAction::CustomDialog(_) => ActionType::CustomDialog,
        }
    }

    /// The button label.
    pub fn label(&self) -> &str {
        match self {
            RowAction::Link(a) => &a.label,
            RowAction::ConfirmationDialog(a) => &a.label,
            RowAction::CustomDialog(a) => &a.label,
        }
    }
}

impl<R> Clone for RowAction<R> {
    fn clone(&self) -> Self {
        match self {
            RowAction::Link(a) => RowAction::Link(LinkAction {
                label: a.label.clone(),
                on_click: Arc::clone(&a.on_click),
            }),
            RowAction::ConfirmationDialog(d) => RowAction::ConfirmationDialog(ConfirmationDialog {
                label: d.label.clone(),
                title: d.title.clone(),
                description: d.description.clone(),
                confirmation_text: d.confirmation_text.clone(),
                cancel_text: d.cancel_text.clone(),
                on_confirm: Arc::clone(&d.on_confirm),
                on_cancel: d.on_cancel.clone(),
            }),
            RowAction::CustomDialog(d) => RowAction::CustomDialog(CustomDialog {
                label: d.label.clone(),
                title: d.title.clone(),
                content: Arc::clone(&d.content),
                confirmation_text: d.confirmation_text.clone(),
                cancel_text: d.cancel_text.clone(),
                on_confirm: Arc::clone(&d.on_confirm),
                on_cancel: d.on_cancel.clone(),
            }),
        }
    }
}

impl<R> fmt::Debug for RowAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("type", &self.action_type())
            .field("label", &self.label())
            .finish()
    }
}

/// The single in-flight action: what was triggered, on which row.
pub struct PendingAction<R> {
    /// The triggered action.
    pub action: RowAction<R>,
    /// The target row, copied at trigger time.
    pub row: R,
    /// Index of the target row in the table data.
    pub row_index: usize,
}

impl<R> PendingAction<R> {
    /// The pending action's discriminant.
    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }
}

impl<R: Clone> Clone for PendingAction<R> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            row: self.row.clone(),
            row_index: self.row_index,
        }
    }
}

impl<R> fmt::Debug for PendingAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAction")
            .field("action", &self.action)
            .field("row_index", &self.row_index)
            .finish()
    }
}

/// Binds a row's actions to the pending-action setter.
pub struct ActionDispatcher<'a, R> {
    row: &'a R,
    row_index: usize,
    actions: &'a [RowAction<R>],
}

impl<'a, R: Clone> ActionDispatcher<'a, R> {
    /// A dispatcher for `actions` on `row`.
    pub fn new(row: &'a R, row_index: usize, actions: &'a [RowAction<R>]) -> Self {
        Self {
            row,
            row_index,
            actions,
        }
    }

    /// One button per action, e.g. `"[Edit] [Delete]"`.
    pub fn view(&self) -> String {
        render_actions(self.actions)
    }

    /// Activates action `index` by handing it to `set_pending`.
    ///
    /// Returns `false` when there is no such action.
    pub fn select<F>(&self, index: usize, set_pending: F) -> bool
    where
        F: FnOnce(PendingAction<R>),
    {
        match self.actions.get(index) {
            Some(action) => {
                set_pending(PendingAction {
                    action: action.clone(),
                    row: self.row.clone(),
                    row_index: self.row_index,
                });
                true
            }
            None => false,
        }
    }
}

/// Renders the button strip for a row's actions.
pub fn render_actions<R>(actions: &[RowAction<R>]) -> String {
    actions
        .iter()
        .map(|a| format!("[{}]", a.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

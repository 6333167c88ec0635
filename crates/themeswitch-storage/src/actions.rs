//! Interface settings actions and their reducer

use crate::state::InterfaceSettings;

/// Actions accepted by the interface settings reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAction {
    /// Replace the selected theme; `None` clears it
    SelectTheme(Option<String>),
}

impl InterfaceAction {
    /// Convenience constructor for selecting a named theme
    pub fn select_theme(name: impl Into<String>) -> Self {
        InterfaceAction::SelectTheme(Some(name.into()))
    }
}

/// Apply an action to the interface settings.
///
/// The selected theme is not validated here; whether it resolves to a theme
/// directory is only decided when it is applied.
pub fn reduce(state: &InterfaceSettings, action: &InterfaceAction) -> InterfaceSettings {
    match action {
        InterfaceAction::SelectTheme(theme) => {
            let mut next = state.clone();
            next.current_theme = theme.clone();
            next
        }
    }
}

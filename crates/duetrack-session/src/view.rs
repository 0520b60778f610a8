//! Presentation state: the search box plus persisted view preferences.

use duetrack_core::{FilterCriteria, FilterType, SortBy, Theme, UserPreferences, ViewMode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Not persisted; starts empty each session
    pub search_term: String,
    pub filter_type: FilterType,
    pub sort_by: SortBy,
    pub view_mode: ViewMode,
    pub theme: Theme,
}

impl ViewState {
    pub fn from_preferences(prefs: &UserPreferences) -> Self {
        Self {
            search_term: String::new(),
            filter_type: prefs.filter_type,
            sort_by: prefs.sort_by.clone(),
            view_mode: prefs.view_mode,
            theme: prefs.theme,
        }
    }

    /// The persisted part of this view.
    pub fn preferences(&self) -> UserPreferences {
        UserPreferences {
            view_mode: self.view_mode,
            sort_by: self.sort_by.clone(),
            filter_type: self.filter_type,
            theme: self.theme,
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.search_term.clone(), self.filter_type, self.sort_by.clone())
    }
}

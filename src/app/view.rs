//! Active screen tracking

/// The two screens of the app
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum View {
    #[default]
    List,
    Form,
}

impl View {
    /// Navigation bar label
    pub fn title(&self) -> &'static str {
        match self {
            View::List => "View Questions",
            View::Form => "New Question",
        }
    }
}

/// Tracks which screen is live; no history
#[derive(Debug, Default)]
pub struct ViewSelector {
    active: View,
}

impl ViewSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    /// Switch screens, returning `(from, to)` when the screen changed
    pub fn switch_to(&mut self, view: View) -> Option<(View, View)> {
        if self.active == view {
            return None;
        }
        let from = self.active;
        self.active = view;
        tracing::debug!(?from, to = ?view, "View changed");
        Some((from, view))
    }
}

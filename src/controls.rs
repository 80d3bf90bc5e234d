use crate::pager::Pager;

pub const ALL_LABEL: &str = "All";

/// A labeled control that yields `action` when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control<A> {
    pub label: String,
    pub action: A,
    pub active: bool,
}

impl<A> Control<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
            active: false,
        }
    }
}

/// An ordered row of controls with a keyboard cursor.
#[derive(Debug, Clone)]
pub struct ControlBar<A> {
    controls: Vec<Control<A>>,
    cursor: usize,
}

impl<A> Default for ControlBar<A> {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
            cursor: 0,
        }
    }
}

impl<A: Clone> ControlBar<A> {
    pub fn new(controls: Vec<Control<A>>) -> Self {
        Self {
            controls,
            cursor: 0,
        }
    }

    pub fn controls(&self) -> &[Control<A>] {
        &self.controls
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.controls.len() {
            self.cursor = index;
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor + 1 < self.controls.len() {
            self.cursor += 1;
        }
    }

    /// Mark the control at `index` as the only active one and return its action.
    pub fn activate(&mut self, index: usize) -> Option<A> {
        if index >= self.controls.len() {
            return None;
        }
        for (i, control) in self.controls.iter_mut().enumerate() {
            control.active = i == index;
        }
        self.cursor = index;
        Some(self.controls[index].action.clone())
    }

    pub fn activate_cursor(&mut self) -> Option<A> {
        self.activate(self.cursor)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.controls.iter().position(|c| c.active)
    }

    pub fn active_label(&self) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.active)
            .map(|c| c.label.as_str())
    }
}

/// The selector a genre-bar label stands for.
pub fn selector_for_label(label: &str) -> String {
    if label == ALL_LABEL {
        String::new()
    } else {
        label.to_string()
    }
}

/// "All", every known genre, then a shortcut for the current year. "All" starts active.
pub fn genre_bar<'a>(genres: impl Iterator<Item = &'a str>, year: &str) -> ControlBar<String> {
    let mut controls = vec![Control::new(ALL_LABEL, String::new())];
    controls.extend(genres.map(|g| Control::new(g, selector_for_label(g))));
    controls.push(Control::new(year, year.to_string()));
    let mut bar = ControlBar::new(controls);
    bar.activate(0);
    bar
}

/// Pagination buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Prev,
    Next,
    Goto(usize),
}

/// "Prev", one button per page, "Next". The current page is marked active.
pub fn page_bar(pager: &Pager) -> ControlBar<PageAction> {
    let mut controls = vec![Control::new("Prev", PageAction::Prev)];
    controls.extend((1..=pager.total_pages()).map(|n| Control::new(n.to_string(), PageAction::Goto(n))));
    controls.push(Control::new("Next", PageAction::Next));
    let mut bar = ControlBar::new(controls);
    bar.activate(pager.page());
    bar
}

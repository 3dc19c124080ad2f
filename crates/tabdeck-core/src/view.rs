//! View controller — which panel is active, and the theme flag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Profile,
    Weather,
    Cats,
    Assistant,
}

impl Panel {
    /// Tab order.
    pub const ALL: [Panel; 4] = [Panel::Profile, Panel::Weather, Panel::Cats, Panel::Assistant];

    pub fn id(self) -> &'static str {
        match self {
            Panel::Profile => "profile",
            Panel::Weather => "weather",
            Panel::Cats => "cats",
            Panel::Assistant => "assistant",
        }
    }

    pub fn from_id(id: &str) -> Option<Panel> {
        Panel::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Profile => "Profile",
            Panel::Weather => "Weather",
            Panel::Cats => "Cat Facts",
            Panel::Assistant => "Assistant",
        }
    }

    fn position(self) -> usize {
        Panel::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    active: Option<Panel>,
    dark_theme: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: Some(Panel::Profile),
            dark_theme: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active panel, `None` after switching to an unknown id.
    pub fn active(&self) -> Option<Panel> {
        self.active
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == Some(panel)
    }

    /// Deactivate everything, then activate the panel named `id`. Unknown
    /// ids leave every panel inactive.
    pub fn switch_to(&mut self, id: &str) {
        self.active = Panel::from_id(id);
    }

    pub fn show(&mut self, panel: Panel) {
        self.active = Some(panel);
    }

    pub fn next(&mut self) {
        self.active = Some(match self.active {
            Some(p) => Panel::ALL[(p.position() + 1) % Panel::ALL.len()],
            None => Panel::Profile,
        });
    }

    pub fn prev(&mut self) {
        self.active = Some(match self.active {
            Some(p) => Panel::ALL[(p.position() + Panel::ALL.len() - 1) % Panel::ALL.len()],
            None => Panel::Profile,
        });
    }

    pub fn dark_theme(&self) -> bool {
        self.dark_theme
    }

    pub fn set_theme(&mut self, dark: bool) {
        self.dark_theme = dark;
    }
}

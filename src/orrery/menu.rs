//! Model behind the camera selection menu. Drawing it is the page's business.

use super::body::BodyId;
use super::camera::Camera;
use super::hierarchy::OrbitHierarchy;

#[derive(Clone, Debug, PartialEq)]
pub enum MenuOption {
    FreeFly,
    Body { id: BodyId, name: String },
}

impl MenuOption {
    pub fn label(&self) -> &str {
        match self {
            MenuOption::FreeFly => "Free fly",
            MenuOption::Body { name, .. } => name.as_str(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SelectionMenu {
    options: Vec<MenuOption>,
    selected: usize,
}

impl SelectionMenu {
    /// "Free fly" first, then every body in declaration order.
    pub fn new(hierarchy: &OrbitHierarchy) -> Self {
        let options = std::iter::once(MenuOption::FreeFly)
            .chain(hierarchy.iter().map(|(id, body)| MenuOption::Body {
                id,
                name: body.name().to_string(),
            }))
            .collect();
        SelectionMenu { options, selected: 0 }
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn selected(&self) -> &MenuOption {
        &self.options[self.selected]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
    }

    /// Highlights the option with this label. Returns false when there is none.
    pub fn highlight(&mut self, label: &str) -> bool {
        match self.options.iter().position(|o| o.label() == label) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Applies the highlighted option to the camera.
    pub fn confirm(&self, camera: &mut Camera) {
        match self.selected() {
            MenuOption::FreeFly => camera.free_fly(),
            MenuOption::Body { id, .. } => camera.anchor_to(*id),
        }
    }
}

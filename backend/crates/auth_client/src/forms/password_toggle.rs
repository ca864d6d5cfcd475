//! Password Visibility Toggle

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordToggle {
    visible: bool,
}

impl PasswordToggle {
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// `type` attribute of the password input
    pub fn input_type(&self) -> &'static str {
        if self.visible { "text" } else { "password" }
    }

    /// Accessible name of the toggle button
    pub fn aria_label(&self) -> &'static str {
        if self.visible { "Hide password" } else { "Show password" }
    }

    pub fn aria_pressed(&self) -> bool {
        self.visible
    }
}

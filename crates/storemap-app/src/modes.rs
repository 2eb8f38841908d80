//! Process-wide display and editing modes.

use crate::markers::RenderContext;

/// Mode flags owned by the app state. Only the toggles on
/// [`crate::LocatorApp`] change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    pub edit_mode: bool,
    pub heatmap_on: bool,
    pub districts_on: bool,
    /// Map clicks place a new store.
    pub map_add_mode: bool,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self {
            edit_mode: false,
            heatmap_on: false,
            districts_on: true,
            map_add_mode: false,
        }
    }
}

impl ModeFlags {
    #[must_use]
    pub fn render_context(&self, is_admin: bool) -> RenderContext {
        RenderContext {
            edit_mode: self.edit_mode,
            is_admin,
            heatmap_on: self.heatmap_on,
        }
    }

    /// Drops every admin-only mode; used on logout.
    pub fn disarm_admin(&mut self) {
        self.edit_mode = false;
        self.map_add_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_overlay_starts_visible() {
        let flags = ModeFlags::default();
        assert!(flags.districts_on);
        assert!(!flags.edit_mode);
        assert!(!flags.heatmap_on);
        assert!(!flags.map_add_mode);
    }

    #[test]
    fn disarm_keeps_display_modes() {
        let mut flags = ModeFlags {
            edit_mode: true,
            heatmap_on: true,
            districts_on: false,
            map_add_mode: true,
        };
        flags.disarm_admin();
        assert!(!flags.edit_mode && !flags.map_add_mode);
        assert!(flags.heatmap_on);
        assert!(!flags.districts_on);
    }
}

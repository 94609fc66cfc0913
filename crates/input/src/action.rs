/// A high-level command produced by keyboard input.
///
/// The scene consumes actions, never raw key events, so the window backend
/// can change without touching camera or animation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Rotate the camera about the global Y axis (positive direction).
    IncreaseAzimuth,
    /// Rotate the camera about the global Y axis (negative direction).
    DecreaseAzimuth,
    /// Lift the camera towards +Y.
    IncreaseElevation,
    /// Lower the camera towards -Y.
    DecreaseElevation,
    /// Move the camera away from the target.
    IncreaseDistance,
    /// Move the camera towards the target.
    DecreaseDistance,
    /// Pause or resume cube animation.
    ToggleAnimation,
}

/// Backend-independent key identifiers that carry a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    U,
    D,
    Space,
}

impl Key {
    /// The fixed key binding table.
    pub fn action(self) -> Action {
        let action = match self {
            Key::Left => Action::DecreaseAzimuth,
            Key::Right => Action::IncreaseAzimuth,
            Key::Down => Action::IncreaseDistance,
            Key::Up => Action::DecreaseDistance,
            Key::U => Action::IncreaseElevation,
            Key::D => Action::DecreaseElevation,
            Key::Space => Action::ToggleAnimation,
        };
        tracing::trace!(?self, ?action, "key bound");
        action
    }
}

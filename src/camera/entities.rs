use bevy::prelude::*;

/// Camera rig looking down at `focus` from `distance` away.
#[derive(Component, Reflect)]
pub struct MapCamera {
    /// Point on the ground the camera looks at.
    pub focus: Vec3,
    /// Distance from the focus.
    pub distance: f32,
}

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::CameraConfig;
use super::entities::MapCamera;
use crate::map::HexMap;
use crate::math;

/// Spawns the camera focused on the middle of the grid.
pub fn spawn_camera(mut commands: Commands, cfg: Res<CameraConfig>, map: Option<Res<HexMap>>) {
    let focus = map.map_or(Vec3::ZERO, |map| map.grid.center());
    let offset = math::orbit_offset(cfg.pitch, cfg.start_distance);
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_translation(focus + offset).looking_at(focus, Vec3::Y),
        MapCamera {
            focus,
            distance: cfg.start_distance,
        },
    ));
}

/// WASD / arrow keys move the focus across the map, clamped to the grid.
pub fn pan(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<CameraConfig>,
    map: Option<Res<HexMap>>,
    mut query: Query<(&mut MapCamera, &Transform)>,
) {
    let Ok((mut rig, transform)) = query.single_mut() else {
        return;
    };

    let forward = transform.forward();
    let forward_xz = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right = transform.right();
    let right_xz = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction += forward_xz;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction -= forward_xz;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction += right_xz;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction -= right_xz;
    }
    if direction == Vec3::ZERO {
        return;
    }

    // Slower when zoomed in.
    let speed = cfg.move_speed * rig.distance / cfg.max_distance;
    let mut focus = rig.focus + direction.normalize() * speed * time.delta_secs();
    if let Some(map) = map {
        let far = map.grid.center() * 2.0;
        focus.x = focus.x.clamp(0.0, far.x);
        focus.z = focus.z.clamp(0.0, far.z);
    }
    rig.focus = focus;
}

/// Scroll wheel moves the camera toward or away from its focus.
pub fn zoom(
    mut scroll: MessageReader<MouseWheel>,
    cfg: Res<CameraConfig>,
    mut query: Query<&mut MapCamera>,
) {
    let Ok(mut rig) = query.single_mut() else {
        return;
    };
    for ev in scroll.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
        rig.distance = math::zoom_distance(
            rig.distance,
            lines * cfg.zoom_speed,
            cfg.min_distance,
            cfg.max_distance,
        );
    }
}

/// Moves the camera transform to match its rig.
pub fn place_camera(
    cfg: Res<CameraConfig>,
    mut query: Query<(&MapCamera, &mut Transform), Changed<MapCamera>>,
) {
    for (rig, mut transform) in &mut query {
        let offset = math::orbit_offset(cfg.pitch, rig.distance);
        *transform = Transform::from_translation(rig.focus + offset).looking_at(rig.focus, Vec3::Y);
    }
}

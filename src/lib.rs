#![warn(missing_docs)]
//! Editable hex terrain map.
//!
//! The core is ECS-free: [`grid::HexGrid`] owns a graph of [`cell::HexCell`]s
//! with elevation, color, and rivers, and [`mesh::HexMesh`] turns any subset
//! of cells into one vertex-colored triangle mesh with terraced slopes,
//! cliffs, and noise-perturbed vertices. The [`map`], [`editor`], and
//! [`camera`] plugins put that on screen with Bevy.

pub mod camera;
pub mod cell;
pub mod editor;
pub mod grid;
pub mod hex;
pub mod map;
pub mod math;
pub mod mesh;
pub mod noise_source;

use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Mouse input paints cells.
    #[default]
    Editing,
    /// World inspector open (Tab to toggle); painting is paused.
    Inspecting,
}

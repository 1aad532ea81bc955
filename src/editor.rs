//! Cell painting: brush edits driven by mouse drags and an egui panel.
//!
//! [`edit_cells`] and [`validate_drag`] work on a bare [`HexGrid`]; the
//! plugin only feeds them the cell under the cursor.

mod entities;
mod systems;

pub use entities::EditorState;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::GameState;
use crate::cell::CellId;
use crate::grid::HexGrid;
use crate::hex::{HexCoordinates, HexDirection};
use crate::map::HexMap;

/// How a brush stroke treats rivers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum RiverMode {
    /// Leave rivers alone.
    #[default]
    Ignore,
    /// Dragging draws a river along the drag direction.
    Yes,
    /// Remove rivers from every brushed cell.
    No,
}

/// What a brush stroke applies to each cell it covers.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct EditOptions {
    /// Color to paint, or `None` to keep colors.
    pub color: Option<Color>,
    /// Whether to apply [`EditOptions::elevation`].
    pub apply_elevation: bool,
    /// Elevation to set.
    pub elevation: i32,
    /// Brush radius in cells; 0 edits one cell.
    pub brush_size: u32,
    /// River handling.
    pub river_mode: RiverMode,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            color: None,
            apply_elevation: true,
            elevation: 0,
            brush_size: 0,
            river_mode: RiverMode::Ignore,
        }
    }
}

/// Editor configuration.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct EditorConfig {
    /// Colors offered by the panel.
    pub palette: Vec<Color>,
    /// Upper bound of the elevation slider.
    pub max_elevation: i32,
    /// Upper bound of the brush size slider.
    pub max_brush_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                Color::srgb(1.0, 0.92, 0.016),
                Color::srgb(0.0, 1.0, 0.0),
                Color::srgb(0.0, 0.0, 1.0),
                Color::WHITE,
            ],
            max_elevation: 6,
            max_brush_size: 4,
        }
    }
}

/// Direction from `previous` to `current` when the cursor moved into an
/// adjacent cell; `None` for jumps and for staying put.
pub fn validate_drag(grid: &HexGrid, previous: CellId, current: CellId) -> Option<HexDirection> {
    HexDirection::ALL
        .into_iter()
        .find(|&direction| grid.neighbor(previous, direction) == Some(current))
}

/// Applies `options` to every cell within the brush around `center`.
///
/// `drag` is the direction the cursor just moved in. With
/// [`RiverMode::Yes`], each brushed cell receives a river flowing in from
/// the cell behind it, so a stroke leaves a river along its path.
pub fn edit_cells(
    grid: &mut HexGrid,
    center: HexCoordinates,
    options: &EditOptions,
    drag: Option<HexDirection>,
) {
    for id in grid.cells_in_brush(center, options.brush_size) {
        edit_cell(grid, id, options, drag);
    }
}

fn edit_cell(grid: &mut HexGrid, id: CellId, options: &EditOptions, drag: Option<HexDirection>) {
    if let Some(color) = options.color {
        grid.set_color(id, color);
    }
    if options.apply_elevation {
        grid.set_elevation(id, options.elevation);
    }
    match (options.river_mode, drag) {
        (RiverMode::No, _) => grid.remove_river(id),
        (RiverMode::Yes, Some(direction)) => {
            if let Some(upstream) = grid.neighbor(id, direction.opposite()) {
                grid.set_outgoing_river(upstream, direction);
            }
        }
        _ => {}
    }
}

/// Editor plugin: mouse painting in [`GameState::Editing`] and the tool panel.
pub struct EditorPlugin(pub EditorConfig);

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<EditorConfig>()
            .register_type::<EditorState>()
            .insert_resource(self.0.clone())
            .init_resource::<EditorState>()
            .add_systems(EguiPrimaryContextPass, systems::editor_panel)
            .add_systems(
                Update,
                systems::paint_cells
                    .run_if(resource_exists::<HexMap>)
                    .run_if(in_state(GameState::Editing)),
            );
    }
}

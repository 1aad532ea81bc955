use bevy::prelude::*;
use bevy_egui::{EguiContext, egui};

use super::entities::{CursorPick, EditorState};
use super::{EditorConfig, RiverMode, edit_cells, validate_drag};
use crate::map::{HexMap, MapOverlay};

/// Tool panel: color palette, elevation, brush size, rivers, and labels.
pub fn editor_panel(
    mut egui_ctx: Query<&mut EguiContext>,
    cfg: Res<EditorConfig>,
    mut state: ResMut<EditorState>,
    mut overlay: ResMut<MapOverlay>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let options = &mut state.options;

    egui::Window::new("Editor")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
        .resizable(false)
        .show(ctx.get_mut(), |ui| {
            ui.label("Color");
            ui.radio_value(&mut options.color, None, "Keep");
            for (i, color) in cfg.palette.iter().enumerate() {
                let srgba = color.to_srgba();
                let swatch = egui::Color32::from_rgb(
                    (srgba.red * 255.0) as u8,
                    (srgba.green * 255.0) as u8,
                    (srgba.blue * 255.0) as u8,
                );
                ui.horizontal(|ui| {
                    ui.radio_value(&mut options.color, Some(*color), format!("Color {}", i + 1));
                    ui.colored_label(swatch, "■");
                });
            }

            ui.separator();
            ui.checkbox(&mut options.apply_elevation, "Elevation");
            ui.add(egui::Slider::new(&mut options.elevation, 0..=cfg.max_elevation));

            ui.separator();
            ui.label("Brush size");
            ui.add(egui::Slider::new(&mut options.brush_size, 0..=cfg.max_brush_size));

            ui.separator();
            ui.label("River");
            ui.horizontal(|ui| {
                ui.radio_value(&mut options.river_mode, RiverMode::Ignore, "Ignore");
                ui.radio_value(&mut options.river_mode, RiverMode::Yes, "Yes");
                ui.radio_value(&mut options.river_mode, RiverMode::No, "No");
            });

            ui.separator();
            ui.checkbox(&mut overlay.show_labels, "Labels");
        });
}

/// Paints the cell under the cursor while the left button is held.
///
/// Moving into an adjacent cell during a stroke counts as a drag, which
/// river mode uses to lay rivers along the stroke.
pub fn paint_cells(
    buttons: Res<ButtonInput<MouseButton>>,
    mut egui_ctx: Query<&mut EguiContext>,
    mut pick: CursorPick,
    mut map: ResMut<HexMap>,
    mut state: ResMut<EditorState>,
) {
    let over_panel = egui_ctx
        .single_mut()
        .is_ok_and(|mut ctx| ctx.get_mut().is_pointer_over_area());
    if !buttons.pressed(MouseButton::Left) || over_panel {
        state.previous_cell = None;
        return;
    }

    let Some(current) = pick.terrain_point().and_then(|p| map.grid.cell_at(p)) else {
        state.previous_cell = None;
        return;
    };

    let drag = state
        .previous_cell
        .filter(|&previous| previous != current)
        .and_then(|previous| validate_drag(&map.grid, previous, current));
    let center = map.grid.cell(current).coordinates();
    edit_cells(&mut map.grid, center, &state.options, drag);
    state.previous_cell = Some(current);
}

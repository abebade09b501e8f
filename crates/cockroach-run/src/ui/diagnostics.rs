//! Diagnostics overlay contents.
//!
//! Displays FPS, character state, camera mode, pause state, and live-tunable
//! movement parameters.

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};
use bevy_egui::{EguiContexts, egui};

use crate::camera::CameraModeState;
use crate::character::{CharacterBody, CharacterState, MovementConfig, VisualModel};

/// Render the diagnostics overlay.
#[allow(clippy::type_complexity)]
pub(super) fn debug_ui_system(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    time: Res<Time<Virtual>>,
    mode_state: Res<CameraModeState>,
    visual_query: Query<&VisualModel>,
    mut character_query: Query<(&CharacterState, &mut MovementConfig), With<CharacterBody>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Diagnostics")
        .default_width(260.0)
        .show(ctx, |ui| {
            if let Some(fps) = diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(bevy::diagnostic::Diagnostic::smoothed)
            {
                ui.label(format!("FPS: {fps:.0}"));
            }

            ui.label(format!("Camera: {:?}", mode_state.current()));
            ui.label(if time.is_paused() {
                "Paused (P to resume)"
            } else {
                "Running (P to pause)"
            });

            if let Ok(model) = visual_query.single() {
                ui.label(format!("Model: {model:?}"));
            }

            let Ok((state, mut config)) = character_query.single_mut() else {
                ui.label("No character");
                return;
            };

            ui.separator();
            ui.label(format!("Speed: {:.2} m/s", state.speed));
            ui.label(format!("Vertical: {:+.2} m/s", state.vertical_velocity));
            ui.label(format!(
                "Grounded: {}",
                if state.grounded { "yes" } else { "no" }
            ));

            ui.separator();
            ui.add(
                egui::Slider::new(&mut config.0.move_force, 0.0..=60.0).text("move force (N)"),
            );
            ui.add(
                egui::Slider::new(&mut config.0.turn_torque, 0.0..=15.0).text("turn torque (N·m)"),
            );
            ui.add(
                egui::Slider::new(&mut config.0.jump_impulse, 0.0..=250.0)
                    .text("jump impulse (N·s)"),
            );
        });

    Ok(())
}

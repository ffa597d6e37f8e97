//! Rotator settings panel using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use rotator_core::offset::{MAX_ANGLE, MIN_ANGLE};

use crate::directory::WorldDirectory;
use crate::types::{Rotator, RotatorAction, RotatorRequest};

/// Adds one settings window per [`Rotator`]. Requires `EguiPlugin`.
pub struct RotatorUiPlugin;

impl Plugin for RotatorUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, rotator_panel);
    }
}

/// Combo box over `choices`; returns the entry the user clicked, if any
fn chooser(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    label: &str,
    current: Option<&str>,
    choices: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or("None"))
        .show_ui(ui, |ui| {
            for choice in choices {
                let selected = current == Some(choice.as_str());
                if ui.selectable_label(selected, choice.as_str()).clicked() && !selected {
                    picked = Some(choice.clone());
                }
            }
        });
    picked
}

fn rotator_panel(
    mut contexts: EguiContexts,
    rotators: Query<(Entity, &Rotator)>,
    directory: WorldDirectory,
    mut requests: MessageWriter<RotatorRequest>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    for (entity, rotator) in rotators.iter() {
        let state = &rotator.state;
        let selections = state.selections();
        let mut actions = Vec::new();

        egui::Window::new(format!("Rotator: {}", selections.host_object()))
            .id(egui::Id::new(("rotator", entity)))
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("Point this controller of the current object...")
                        .color(egui::Color32::GRAY),
                );
                if let Some(name) = chooser(
                    ui,
                    (entity, "local"),
                    "Local Controller",
                    selections.local_controller(),
                    &selections.local_choices(&directory),
                ) {
                    actions.push(RotatorAction::SetLocalController(name));
                }

                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("...toward this controller of this object:")
                        .color(egui::Color32::GRAY),
                );
                if let Some(name) = chooser(
                    ui,
                    (entity, "remote_object"),
                    "Remote Object",
                    selections.remote_object(),
                    &selections.remote_object_choices(&directory),
                ) {
                    actions.push(RotatorAction::SetRemoteObject(name));
                }
                if let Some(name) = chooser(
                    ui,
                    (entity, "remote_controller"),
                    "Remote Controller",
                    selections.remote_controller(),
                    &selections.remote_controller_choices(&directory),
                ) {
                    actions.push(RotatorAction::SetRemoteController(name));
                }

                ui.separator();

                let mut paused = state.is_paused();
                if ui.checkbox(&mut paused, "Paused").changed() {
                    actions.push(RotatorAction::SetPaused(paused));
                }

                let mut offset = state.offset();
                let mut offset_changed = false;
                for (label, value) in [
                    ("Offset X", &mut offset.x),
                    ("Offset Y", &mut offset.y),
                    ("Offset Z", &mut offset.z),
                ] {
                    offset_changed |= ui
                        .add(egui::Slider::new(value, MIN_ANGLE..=MAX_ANGLE).text(label))
                        .changed();
                }
                if offset_changed {
                    actions.push(RotatorAction::SetOffset(offset));
                }

                ui.horizontal(|ui| {
                    if ui.button("Reset offsets").clicked() {
                        actions.push(RotatorAction::ResetOffset);
                    }
                    // Recording needs something to measure against
                    if rotator.bindings.remote.is_some()
                        && ui.button("Record current offset").clicked()
                    {
                        actions.push(RotatorAction::RecordOffset);
                    }
                });
            });

        requests.write_batch(
            actions
                .into_iter()
                .map(|action| RotatorRequest::new(entity, action)),
        );
    }
}

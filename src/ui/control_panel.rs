use crate::prelude::*;
use bevy::color::ColorToPacked;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use std::ops::RangeInclusive;

pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterDraft>()
            .add_systems(Startup, (configure_visuals_system, sync_draft_system))
            .add_systems(Update, control_panel_system);
    }
}

/// Values shown in the panel. Sliders edit this copy while they move; the parameter store
/// only sees a value once its widget reports the edit finished.
#[derive(Resource, Default)]
struct ParameterDraft(GalaxyParameters);

/// What a widget reported this frame
#[derive(Clone, Copy, Default, Debug)]
struct WidgetActivity {
    changed: bool,
    dragged: bool,
    drag_stopped: bool,
    has_focus: bool,
    lost_focus: bool,
}

impl From<&egui::Response> for WidgetActivity {
    fn from(response: &egui::Response) -> Self {
        Self {
            changed: response.changed(),
            dragged: response.dragged(),
            drag_stopped: response.drag_stopped(),
            has_focus: response.has_focus(),
            lost_focus: response.lost_focus(),
        }
    }
}

impl WidgetActivity {
    /// A drag ending, keyboard focus leaving, or a one-off change like a click on the track
    fn finished(&self) -> bool {
        self.drag_stopped || self.lost_focus || (self.changed && !self.dragged && !self.has_focus)
    }
}

/// Color buttons commit once their popup is closed
fn color_commit(draft: Srgba, committed: Srgba, popup_open: bool) -> Option<Srgba> {
    (!popup_open && draft != committed).then_some(draft)
}

/// Applies committed edits to the store. Returns true if a regeneration is due, which is
/// on every commit, even one that leaves the value as it was.
fn commit_edits(store: &mut GalaxyParameters, edits: &[ParameterEdit]) -> bool {
    for edit in edits {
        store.set(*edit);
    }
    !edits.is_empty()
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: egui::CornerRadius::ZERO,
        ..egui::Visuals::dark()
    });
}

fn sync_draft_system(params: Res<GalaxyParameters>, mut draft: ResMut<ParameterDraft>) {
    draft.0 = params.get();
}

fn slider<T: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    value: &mut T,
    range: RangeInclusive<T>,
    step: f64,
    label: &str,
) -> bool {
    let response = ui.add(egui::Slider::new(value, range).step_by(step).text(label));
    WidgetActivity::from(&response).finished()
}

fn color_button(ui: &mut egui::Ui, color: &mut Srgba, label: &str) {
    ui.horizontal(|ui| {
        let [r, g, b, _] = color.to_u8_array();
        let mut rgb = [r, g, b];
        if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(label);
    });
}

fn control_panel_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<ParameterDraft>,
    mut params: ResMut<GalaxyParameters>,
    mut regenerate: EventWriter<RegenerateGalaxy>,
    settings: Res<ViewerSettings>,
) {
    let ctx = contexts.ctx_mut();
    let (min, max) = (GalaxyParameters::MIN, GalaxyParameters::MAX);
    let draft = &mut draft.0;
    let mut edits = Vec::new();

    egui::SidePanel::right("galaxy_panel")
        .default_width(settings.panel_width)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            if slider(ui, &mut draft.count, min.count..=max.count, 1.0, "Number of stars") {
                edits.push(ParameterEdit::Count(draft.count));
            }
            if slider(ui, &mut draft.size, min.size..=max.size, 0.01, "Star size") {
                edits.push(ParameterEdit::Size(draft.size));
            }
            if slider(ui, &mut draft.radius, min.radius..=max.radius, 0.01, "Galaxy radius") {
                edits.push(ParameterEdit::Radius(draft.radius));
            }
            if slider(
                ui,
                &mut draft.branches,
                min.branches..=max.branches,
                1.0,
                "Galaxy branches",
            ) {
                edits.push(ParameterEdit::Branches(draft.branches));
            }
            if slider(ui, &mut draft.spin, min.spin..=max.spin, 0.01, "Galaxy spin") {
                edits.push(ParameterEdit::Spin(draft.spin));
            }
            if slider(
                ui,
                &mut draft.randomness,
                min.randomness..=max.randomness,
                0.01,
                "Galaxy randomness",
            ) {
                edits.push(ParameterEdit::Randomness(draft.randomness));
            }
            if slider(
                ui,
                &mut draft.random_power,
                min.random_power..=max.random_power,
                0.1,
                "Star spread",
            ) {
                edits.push(ParameterEdit::RandomPower(draft.random_power));
            }

            ui.separator();
            color_button(ui, &mut draft.inside_color, "Inside color");
            color_button(ui, &mut draft.outside_color, "Outside color");
        });

    let popup_open = ctx.memory(|memory| memory.any_popup_open());
    if let Some(color) = color_commit(draft.inside_color, params.inside_color, popup_open) {
        edits.push(ParameterEdit::InsideColor(color));
    }
    if let Some(color) = color_commit(draft.outside_color, params.outside_color, popup_open) {
        edits.push(ParameterEdit::OutsideColor(color));
    }

    if commit_edits(&mut params, &edits) {
        debug!("Committed {edits:?}");
        regenerate.write(RegenerateGalaxy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragging_does_not_commit() {
        let activity = WidgetActivity {
            changed: true,
            dragged: true,
            ..default()
        };
        assert!(!activity.finished());
    }

    #[test]
    fn drag_release_commits() {
        let activity = WidgetActivity {
            drag_stopped: true,
            ..default()
        };
        assert!(activity.finished());
    }

    #[test]
    fn typing_commits_when_focus_leaves() {
        let typing = WidgetActivity {
            changed: true,
            has_focus: true,
            ..default()
        };
        assert!(!typing.finished());

        let left = WidgetActivity {
            lost_focus: true,
            ..default()
        };
        assert!(left.finished());
    }

    #[test]
    fn click_on_track_commits() {
        let activity = WidgetActivity {
            changed: true,
            ..default()
        };
        assert!(activity.finished());
        assert!(!WidgetActivity::default().finished());
    }

    #[test]
    fn color_waits_for_popup_to_close() {
        let committed = Srgba::rgb_u8(0xff, 0x60, 0x30);
        let picked = Srgba::rgb_u8(0x10, 0x20, 0x30);

        assert_eq!(color_commit(picked, committed, true), None);
        assert_eq!(color_commit(picked, committed, false), Some(picked));
        assert_eq!(color_commit(committed, committed, false), None);
    }

    #[test]
    fn every_commit_regenerates() {
        let mut store = GalaxyParameters::default();
        assert!(!commit_edits(&mut store, &[]));

        let same = [ParameterEdit::Branches(store.branches)];
        assert!(commit_edits(&mut store, &same));
        assert_eq!(store, GalaxyParameters::default());

        assert!(commit_edits(&mut store, &[ParameterEdit::Spin(1.0)]));
        assert_eq!(store.spin, 1.0);
    }
}

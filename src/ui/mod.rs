use bevy::prelude::*;

mod camera;
mod control_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((camera::CameraPlugin, control_panel::ControlPanelPlugin));
    }
}

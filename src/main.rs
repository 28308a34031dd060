use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowTheme};
use bevy_egui::EguiPlugin;

mod config;
mod galaxy;
mod graphics;
mod ui;

mod prelude;

use config::ViewerSettings;

fn main() {
    let (settings, settings_failure) = ViewerSettings::load();

    let mut app = App::new();
    app
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: settings.window_title.clone(),
                        name: Some("spiral_galaxy.app".into()),
                        present_mode: PresentMode::AutoVsync,
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        window_theme: Some(WindowTheme::Dark),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: settings.log_filter.clone(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: false,
        })
        .insert_resource(galaxy::GalaxySeed(settings.seed))
        .insert_resource(settings)
        .add_plugins((
            config::SettingsPlugin,
            galaxy::GalaxyPlugin,
            graphics::GraphicsPlugin,
            ui::UiPlugin,
        ));

    if let Some(failure) = settings_failure {
        app.insert_resource(failure);
    }
    app.run();
}

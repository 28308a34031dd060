use crate::prelude::*;
use bevy::prelude::*;

pub struct SpinPlugin;

impl Plugin for SpinPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spin_galaxy_system);
    }
}

/// Turns a galaxy about its vertical axis.
pub fn spin(transform: &mut Transform, radians: f32) {
    transform.rotate_y(radians);
}

/// Fixed per-frame increment, so the spin speed follows the display refresh rate
fn spin_galaxy_system(
    settings: Res<ViewerSettings>,
    mut galaxies: Query<&mut Transform, With<GalaxyPoints>>,
) {
    for mut transform in &mut galaxies {
        spin(&mut transform, settings.spin_per_frame);
    }
}

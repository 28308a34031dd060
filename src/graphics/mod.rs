use bevy::prelude::*;

mod points_material;
mod spin;

pub use points_material::{build_points_mesh, GalaxyPointsMaterial};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            points_material::PointsMaterialPlugin,
            spin::SpinPlugin,
        ));
    }
}

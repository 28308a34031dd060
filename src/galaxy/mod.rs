use bevy::prelude::*;

mod generator;
mod parameters;
mod regeneration;
mod slot;

pub use generator::{generate, generate_with_rng, PointCloud};
pub use parameters::{GalaxyParameters, ParameterEdit};
pub use regeneration::{GalaxyPoints, GalaxySeed, RegenerateGalaxy};
pub use slot::{regenerate, regenerate_with, CloudSlot, SceneGraph};

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParameters::default())
            .add_plugins(regeneration::RegenerationPlugin);
    }
}

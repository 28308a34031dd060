use bevy::prelude::*;

/// Inputs to the galaxy generator.
///
/// Only the control panel writes to this resource, and only with whole committed values;
/// the generator reads a snapshot through [`GalaxyParameters::get`].
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32, // radians per unit of radius
    pub randomness: f32,
    pub random_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 187_200,
            size: 0.01,
            radius: 12.34,
            branches: 5,
            spin: -2.15,
            randomness: 1.48,
            random_power: 7.1,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParameters {
    // Slider bounds, colors are unbounded
    pub const MIN: Self = Self {
        count: 10,
        size: 0.01,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        random_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
    };
    pub const MAX: Self = Self {
        count: 200_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        random_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
    };

    pub fn get(&self) -> GalaxyParameters {
        *self
    }

    /// Commits a single field. No range checks happen here and no regeneration is triggered.
    pub fn set(&mut self, edit: ParameterEdit) {
        match edit {
            ParameterEdit::Count(v) => self.count = v,
            ParameterEdit::Size(v) => self.size = v,
            ParameterEdit::Radius(v) => self.radius = v,
            ParameterEdit::Branches(v) => self.branches = v,
            ParameterEdit::Spin(v) => self.spin = v,
            ParameterEdit::Randomness(v) => self.randomness = v,
            ParameterEdit::RandomPower(v) => self.random_power = v,
            ParameterEdit::InsideColor(v) => self.inside_color = v,
            ParameterEdit::OutsideColor(v) => self.outside_color = v,
        }
    }
}

/// A committed value for one parameter field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterEdit {
    Count(u32),
    Size(f32),
    Radius(f32),
    Branches(u32),
    Spin(f32),
    Randomness(f32),
    RandomPower(f32),
    InsideColor(Srgba),
    OutsideColor(Srgba),
}

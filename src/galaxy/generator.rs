use super::GalaxyParameters;
use bevy::color::Mix;
use bevy::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Points filled per rayon task, each task draws from its own thread rng
const BATCH_SIZE: usize = 4096;

/// Index-parallel positions and linear RGB colors, one entry per star.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` buffer
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `r, g, b, r, g, b, ...` buffer
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Radial color ramp from the galaxy center to its rim, mixed in linear space.
struct Gradient {
    inside: LinearRgba,
    outside: LinearRgba,
    radius: f32,
}

impl Gradient {
    fn new(params: &GalaxyParameters) -> Self {
        Self {
            inside: params.inside_color.into(),
            outside: params.outside_color.into(),
            radius: params.radius,
        }
    }

    fn sample(&self, radius: f32) -> [f32; 3] {
        // a zero-radius galaxy is entirely inside color
        let t = if self.radius > 0.0 {
            radius / self.radius
        } else {
            0.0
        };
        let c = self.inside.mix(&self.outside, t);
        [
            c.red.clamp(0.0, 1.0),
            c.green.clamp(0.0, 1.0),
            c.blue.clamp(0.0, 1.0),
        ]
    }
}

/// Angle of the spiral arm a star index belongs to. Arms are assigned round-robin by index.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1);
    (index % branches as usize) as f32 / branches as f32 * TAU
}

/// Offset along one axis. Raising to `random_power` pulls most samples towards the arm.
fn jitter<R: Rng + ?Sized>(rng: &mut R, params: &GalaxyParameters, radius: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(params.random_power);
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * params.randomness * radius
}

fn sample_star<R: Rng + ?Sized>(
    index: usize,
    params: &GalaxyParameters,
    gradient: &Gradient,
    rng: &mut R,
) -> ([f32; 3], [f32; 3]) {
    // Uniform in radius rather than area, which thins out the core on purpose
    let radius = rng.random::<f32>() * params.radius;
    let angle = branch_angle(index, params.branches) + radius * params.spin;

    let offset = Vec3::new(
        jitter(rng, params, radius),
        jitter(rng, params, radius),
        jitter(rng, params, radius),
    );
    let pos = vec3(angle.cos() * radius, 0.0, angle.sin() * radius) + offset;

    (pos.to_array(), gradient.sample(radius))
}

/// Builds a fresh spiral point cloud with exactly `params.count` stars.
///
/// Sampling is spread over rayon in batches, each with an unseeded thread rng, so two calls
/// with the same parameters give different clouds. The call returns only once every
/// buffer is fully written.
pub fn generate(params: &GalaxyParameters) -> PointCloud {
    let count = params.count as usize;
    let gradient = Gradient::new(params);

    let mut positions = vec![[0.0; 3]; count];
    let mut colors = vec![[0.0; 3]; count];

    positions
        .par_chunks_mut(BATCH_SIZE)
        .zip(colors.par_chunks_mut(BATCH_SIZE))
        .enumerate()
        .for_each(|(batch, (batch_positions, batch_colors))| {
            let mut rng = rand::rng();
            let first = batch * BATCH_SIZE;
            for (offset, (position, color)) in batch_positions
                .iter_mut()
                .zip(batch_colors.iter_mut())
                .enumerate()
            {
                (*position, *color) = sample_star(first + offset, params, &gradient, &mut rng);
            }
        });

    PointCloud { positions, colors }
}

/// Sequential version of [`generate`] drawing from the given rng.
/// A seeded rng reproduces the same cloud.
pub fn generate_with_rng<R: Rng + ?Sized>(params: &GalaxyParameters, rng: &mut R) -> PointCloud {
    let gradient = Gradient::new(params);
    let (positions, colors) = (0..params.count as usize)
        .map(|index| sample_star(index, params, &gradient, &mut *rng))
        .unzip();

    PointCloud { positions, colors }
}

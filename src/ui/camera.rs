use crate::prelude::*;
use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
};
use bevy_egui::EguiContexts;

/// Keeps the orbit from flipping over the poles
const MAX_PITCH: f32 = 1.5;
/// Pixel scroll deltas are roughly this many times larger than line deltas
const PIXELS_PER_LINE: f32 = 16.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, orbit_camera_system);
    }
}

fn spawn_camera(
    mut commands: Commands,
    mut clear_color: ResMut<ClearColor>,
    settings: Res<ViewerSettings>,
) {
    *clear_color = ClearColor(Color::BLACK);

    let camera = &settings.camera;
    let position = Vec3::from_array(camera.position);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        // star colors are already final, keep them out of the tonemapper
        Tonemapping::None,
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::looking_from(position, Vec3::ZERO),
    ));
}

/// Damped orbit around a target point.
///
/// Input accumulates into velocities, each frame applies `damping` of the remaining
/// velocity, so a drag keeps gliding for a moment after the mouse stops.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    /// Screen space, in units of orbit distance
    pan_velocity: Vec2,
}

impl OrbitCamera {
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            pan_velocity: Vec2::ZERO,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Feeds a rotating drag, a panning drag (both pixels) and scroll (lines) into the orbit
    /// velocities
    pub fn push(&mut self, drag: Vec2, pan: Vec2, scroll_lines: f32, settings: &CameraSettings) {
        self.yaw_velocity -= drag.x * settings.rotate_speed;
        self.pitch_velocity += drag.y * settings.rotate_speed;
        self.zoom_velocity += scroll_lines * settings.zoom_speed;
        self.pan_velocity += pan * settings.pan_speed;
    }

    /// Camera right and up axes for the current orbit angles
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right = vec3(cos_yaw, 0.0, -sin_yaw);
        let toward_camera = (self.translation() - self.target) / self.distance;
        (right, toward_camera.cross(right))
    }

    pub fn step(&mut self, settings: &CameraSettings) {
        let damping = settings.damping.clamp(0.0, 1.0);

        self.yaw += self.yaw_velocity * damping;
        self.pitch = (self.pitch + self.pitch_velocity * damping).clamp(-MAX_PITCH, MAX_PITCH);
        self.distance = (self.distance * (1.0 - self.zoom_velocity * damping))
            .clamp(settings.min_distance, settings.max_distance);

        // dragging right moves the scene right, so the target goes left
        let (right, up) = self.screen_axes();
        let pan = self.pan_velocity * damping * self.distance;
        self.target += up * pan.y - right * pan.x;

        self.yaw_velocity *= 1.0 - damping;
        self.pitch_velocity *= 1.0 - damping;
        self.zoom_velocity *= 1.0 - damping;
        self.pan_velocity *= 1.0 - damping;
    }
}

fn orbit_camera_system(
    mut cameras: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    settings: Res<ViewerSettings>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = cameras.single_mut() else {
        return;
    };

    // the control panel owns the pointer while it is hovered or dragged
    if !contexts.ctx_mut().wants_pointer_input() {
        let held = |button| {
            if mouse_buttons.pressed(button) {
                mouse_motion.delta
            } else {
                Vec2::ZERO
            }
        };
        let scroll_lines = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
        };
        orbit.push(
            held(MouseButton::Left),
            held(MouseButton::Right),
            scroll_lines,
            &settings.camera,
        );
    }

    orbit.step(&settings.camera);
    transform.translation = orbit.translation();
    transform.look_at(orbit.target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CameraSettings {
        CameraSettings::default()
    }

    #[test]
    fn starts_at_the_configured_position() {
        let position = Vec3::new(3.0, 6.0, 10.0);
        let orbit = OrbitCamera::looking_from(position, Vec3::ZERO);
        assert!(orbit.translation().abs_diff_eq(position, 1e-4));
        assert!((orbit.distance - position.length()).abs() < 1e-5);
    }

    #[test]
    fn idle_camera_stays_put() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(3.0, 6.0, 10.0), Vec3::ZERO);
        let before = orbit.clone();
        for _ in 0..10 {
            orbit.step(&settings());
        }
        assert_eq!(orbit, before);
    }

    #[test]
    fn drag_glides_to_the_full_rotation() {
        let settings = settings();
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        orbit.push(Vec2::new(-100.0, 0.0), Vec2::ZERO, 0.0, &settings);
        orbit.step(&settings);
        let after_one = orbit.yaw;
        for _ in 0..1000 {
            orbit.step(&settings);
        }

        let full = 100.0 * settings.rotate_speed;
        // a single frame only covers the damping fraction of the drag
        assert!((after_one - full * settings.damping).abs() < 1e-5);
        assert!((orbit.yaw - full).abs() < 1e-3);
        assert!((orbit.distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let settings = settings();
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        orbit.push(Vec2::new(0.0, 1e6), Vec2::ZERO, 0.0, &settings);
        for _ in 0..100 {
            orbit.step(&settings);
        }
        assert!(orbit.pitch <= MAX_PITCH);
        assert!(orbit.translation().is_finite());
    }

    #[test]
    fn scrolling_up_zooms_in_within_limits() {
        let settings = settings();
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        orbit.push(Vec2::ZERO, Vec2::ZERO, 3.0, &settings);
        for _ in 0..200 {
            orbit.step(&settings);
        }
        assert!(orbit.distance < 10.0);

        orbit.push(Vec2::ZERO, Vec2::ZERO, 1e4, &settings);
        for _ in 0..200 {
            orbit.step(&settings);
        }
        assert!(orbit.distance >= settings.min_distance);
    }

    #[test]
    fn right_drag_pans_the_target() {
        let settings = settings();
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        orbit.push(Vec2::ZERO, Vec2::new(100.0, 50.0), 0.0, &settings);
        for _ in 0..1000 {
            orbit.step(&settings);
        }

        let scale = settings.pan_speed * 10.0;
        // looking down -z, a right drag sends the target to -x and a downward drag to +y
        assert!((orbit.target.x + 100.0 * scale).abs() < 1e-3);
        assert!((orbit.target.y - 50.0 * scale).abs() < 1e-3);
        assert!(orbit.target.z.abs() < 1e-5);

        // panning carries the camera along without turning or zooming
        assert!((orbit.distance - 10.0).abs() < 1e-5);
        assert!(orbit.yaw.abs() < 1e-6 && orbit.pitch.abs() < 1e-6);
        let offset = orbit.translation() - orbit.target;
        assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));
    }
}

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides where settings are read from
pub const SETTINGS_PATH_VAR: &str = "SPIRAL_GALAXY_SETTINGS";
const DEFAULT_SETTINGS_PATH: &str = "settings.ron";

/// Viewer settings. Galaxy parameters are not part of this, they always start from defaults.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewerSettings {
    pub window_title: String,
    /// `tracing` filter handed to bevy's log plugin
    pub log_filter: String,
    /// Rotation of the galaxy about its axis, in radians per frame
    pub spin_per_frame: f32,
    pub panel_width: f32,
    /// Fixed rng seed for reproducible galaxies, unseeded when absent
    pub seed: Option<u64>,
    pub camera: CameraSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_title: "Spiral Galaxy".into(),
            log_filter: "wgpu=error,naga=warn,spiral_galaxy=info".into(),
            spin_per_frame: 0.0005,
            panel_width: 400.0,
            seed: None,
            camera: CameraSettings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Fraction of the remaining orbit velocity applied each frame
    pub damping: f32,
    /// Radians of orbit per pixel of mouse drag
    pub rotate_speed: f32,
    /// Relative distance change per scroll line
    pub zoom_speed: f32,
    /// Target movement per pixel of right drag, as a fraction of the orbit distance
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [3.0, 6.0, 10.0],
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
            pan_speed: 0.002,
            min_distance: 0.5,
            max_distance: 60.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

impl ViewerSettings {
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
    }

    pub fn from_ron(contents: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Loads settings from [`ViewerSettings::path`], falling back to defaults.
    pub fn load() -> (Self, Option<SettingsLoadError>) {
        Self::load_or_default(&Self::path())
    }

    /// The log plugin is not running yet at this point, so a failure is handed back to be
    /// reported by [`SettingsPlugin`] once it is.
    pub fn load_or_default(path: &Path) -> (Self, Option<SettingsLoadError>) {
        match Self::load_from_file(path) {
            Ok(settings) => (settings, None),
            Err(error) => (
                Self::default(),
                Some(SettingsLoadError {
                    path: path.to_path_buf(),
                    error,
                }),
            ),
        }
    }
}

/// Why the settings file was not used
#[derive(Resource, Debug)]
pub struct SettingsLoadError {
    pub path: PathBuf,
    pub error: SettingsError,
}

impl SettingsLoadError {
    fn is_missing_file(&self) -> bool {
        matches!(&self.error, SettingsError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, report_settings_system);
    }
}

fn report_settings_system(mut commands: Commands, failure: Option<Res<SettingsLoadError>>) {
    let Some(failure) = failure else {
        return;
    };
    if failure.is_missing_file() {
        info!("No settings at {:?}, using defaults", failure.path);
    } else {
        warn!(
            "Failed to load settings from {:?}: {}. Using defaults.",
            failure.path, failure.error
        );
    }
    commands.remove_resource::<SettingsLoadError>();
}

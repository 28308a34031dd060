pub use crate::config::{CameraSettings, ViewerSettings};
pub use crate::galaxy::{
    GalaxyParameters, GalaxyPoints, ParameterEdit, PointCloud, RegenerateGalaxy,
};

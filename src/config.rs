//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SERVO_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use servo_input::CameraRig;
use servo_math::Vec3;
use servo_vehicle::VehicleConfig as ControllerConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Vehicle configuration
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Scene configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Headless demo run
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SERVO_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SERVO_VEHICLE__ENGINE_TORQUE=800 -> vehicle.engine_torque = 800
        figment = figment.merge(Env::prefixed("SERVO_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Fixed simulation step in seconds
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -10.0,
            timestep: 1.0 / 60.0,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics world's config
    pub fn to_physics_config(&self) -> servo_physics::PhysicsConfig {
        servo_physics::PhysicsConfig::new(self.gravity)
    }
}

/// Vehicle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Engine speed at full throttle (radians per second)
    pub max_engine_speed: f32,
    /// Engine motor torque
    pub engine_torque: f32,
    /// Height above the scene origin the forklift is dropped from
    pub spawn_height: f32,
    /// RON part table; the built-in forklift table when unset
    #[serde(default)]
    pub parts_path: Option<String>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_engine_speed: 20.0,
            engine_torque: 1000.0,
            spawn_height: 1.5,
            parts_path: None,
        }
    }
}

impl VehicleConfig {
    /// Convert to the controller's config
    pub fn to_controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            max_engine_speed: self.max_engine_speed,
            engine_torque: self.engine_torque,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Third-person distance behind the player
    pub distance: f32,
    /// Third-person aim height above the player origin
    pub height_above_head: f32,
    /// Cockpit eye position in chassis space [x, y, z]
    pub eye_point: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 8.0,
            height_above_head: 2.0,
            eye_point: [-0.8, 1.5, 0.0],
        }
    }
}

impl CameraConfig {
    /// Build a camera rig with these settings
    pub fn to_camera_rig(&self) -> CameraRig {
        CameraRig::new()
            .with_distance(self.distance)
            .with_height_above_head(self.height_above_head)
            .with_eye_point(Vec3::from_array(self.eye_point))
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene origin (floor surface under the spawn point) [x, y, z]
    pub origin: [f32; 3],
    /// Lumber yard positions relative to the origin
    pub lumber_yards: Vec<[f32; 3]>,
    /// Floor edge length
    pub floor_size: f32,
    /// RON forklift model; the procedural model when unset
    #[serde(default)]
    pub model_path: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            lumber_yards: vec![[5.0, 0.0, 0.0], [5.0, 0.0, 10.0]],
            floor_size: 200.0,
            model_path: None,
        }
    }
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Number of fixed steps to run
    pub steps: u32,
    /// Log a status line every this many steps (0 disables)
    pub report_interval: u32,
    /// Scripted key events, `"<step> <KeyName> <down|up>"`
    pub script: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            steps: 600,
            report_interval: 60,
            script: Vec::new(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

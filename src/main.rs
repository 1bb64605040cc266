//! Servo joints - articulated forklift demo
//!
//! Builds the demo scene and runs a headless fixed-step loop, driven by the
//! scripted key and slider events from the configuration.

use servo_core::ModelTemplate;
use servo_input::{CameraRig, VehicleInputController};
use servo_math::Vec3;
use servo_vehicle::{forklift_template, PartTable};

use servo_joints::config::AppConfig;
use servo_joints::input::{InputAction, InputMapper, InputScript, ScriptAction, Slider};
use servo_joints::scene::{DemoScene, DemoSceneBuilder};
use servo_joints::systems::SimulationSystem;

/// Build the scene described by the configuration
fn build_scene(config: &AppConfig) -> Result<DemoScene, Box<dyn std::error::Error>> {
    let model = match &config.scene.model_path {
        Some(path) => {
            log::info!("Loading forklift model from {}", path);
            ModelTemplate::load(path)?
        }
        None => forklift_template(),
    };
    let table = match &config.vehicle.parts_path {
        Some(path) => {
            log::info!("Loading part table from {}", path);
            PartTable::load(path)?
        }
        None => PartTable::forklift(),
    };

    let mut builder = DemoSceneBuilder::new()
        .with_physics(config.physics.to_physics_config())
        .with_vehicle_config(config.vehicle.to_controller_config())
        .with_origin(Vec3::from_array(config.scene.origin))
        .add_floor(config.scene.floor_size);
    for offset in &config.scene.lumber_yards {
        builder = builder.add_lumber_yard(Vec3::from_array(*offset));
    }
    let builder = builder.add_forklift(&model, config.vehicle.spawn_height, &table)?;
    Ok(builder.build())
}

/// Apply one scripted action; returns false when the demo should stop
fn apply_action(action: ScriptAction, input: &mut VehicleInputController) -> bool {
    match action {
        ScriptAction::Key(key, state) => match InputMapper::map_keyboard(key, state) {
            Some(InputAction::Exit) => return false,
            Some(InputAction::ShowHelp) => {
                for line in input.help_lines() {
                    log::info!("{}", line);
                }
            }
            None => {
                input.process_keyboard(key, state);
            }
        },
        ScriptAction::Slider(Slider::Lift, value) => input.set_lift(value),
        ScriptAction::Slider(Slider::Tilt, value) => input.set_tilt_degrees(value),
        ScriptAction::Slider(Slider::Palette, value) => input.set_palette(value),
    }
    true
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = build_scene(config)?;
    let mut script = InputScript::parse(&config.demo.script)?;
    let mut input = VehicleInputController::new();
    let mut camera: CameraRig = config.camera.to_camera_rig();
    let mut sim = SimulationSystem::new(config.physics.timestep);

    log::info!(
        "Scene ready: {} bodies, {} joints, {} scripted events",
        scene.world.body_count(),
        scene.world.joint_count(),
        script.len()
    );

    'frames: for step in 0..config.demo.steps {
        for event in script.take_due(step) {
            if !apply_action(event.action, &mut input) {
                log::info!("Exit requested at step {}", step);
                break 'frames;
            }
        }

        let result = sim.update(&mut scene, &mut input, &mut camera)?;

        let interval = config.demo.report_interval;
        if interval > 0 && result.step % interval == 0 {
            let chassis = scene
                .active_vehicle()
                .and_then(|h| scene.vehicles.get(h))
                .map(|v| v.chassis_matrix(&scene.world))
                .transpose()?;
            log::info!(
                "Step {}: chassis {:?}, controls {:?}, pairs {}/{} processed/skipped",
                result.step,
                chassis.map(|m| m.posit),
                result.controls,
                result.report.processed_pairs,
                result.report.skipped_pairs
            );
        }
    }

    log::info!("Demo finished after {} steps", sim.step());
    Ok(())
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();
    log::info!("Starting servo joints demo");

    if let Err(e) = run(&config) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

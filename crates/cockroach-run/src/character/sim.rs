//! Headless character controller simulator.
//!
//! Runs actual Avian3D physics on a character body to measure real top speed,
//! acceleration, yaw rate, and jump height for a character definition.
//!
//! This binary reuses the same `controller_step_system` as the main
//! application, just with scripted inputs instead of keyboard state.
//!
//! Run with: cargo run -p cockroach-run --bin controller-sim -- [character_name]
//! Example: cargo run -p cockroach-run --bin controller-sim -- bruiser

mod sim {
    use std::env;

    use avian3d::prelude::*;
    use bevy::{
        app::ScheduleRunnerPlugin,
        prelude::*,
        render::settings::{RenderCreation, WgpuSettings},
    };

    use cockroach_run::character::{
        CharacterBody, CharacterDefinitions, CharacterState, ControllerInput, MovementConfig,
        controller::controller_step_system,
    };

    /// Fixed timestep for physics simulation (60 Hz).
    const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

    /// Duration of each test phase (seconds).
    const SETTLE_TIME: f32 = 1.0;
    const DRIVE_TIME: f32 = 6.0;
    const TURN_TIME: f32 = 3.0;
    const JUMP_TIME: f32 = 2.0;

    /// Phase of the simulation script.
    #[derive(Resource, Default)]
    enum SimPhase {
        /// Let the body settle onto the ground.
        #[default]
        Settle,
        /// Full forward drive, measuring acceleration and top speed.
        Drive,
        /// Forward plus turn, measuring yaw rate.
        Turn,
        /// Held jump, measuring apex and single-impulse behavior.
        Jump,
        /// Simulation complete.
        Complete,
    }

    /// Elapsed time within the current phase.
    #[derive(Resource, Default)]
    struct PhaseClock(f32);

    /// Measurement results accumulated during the test.
    #[derive(Resource)]
    struct MeasurementResults {
        character_name: String,
        mass: f32,
        max_speed: f32,
        time_to_90_percent: Option<f32>,
        max_yaw_rate: f32,
        jump_apex: f32,
        liftoff_count: u32,
        was_grounded: bool,
    }

    impl Default for MeasurementResults {
        fn default() -> Self {
            Self {
                character_name: String::new(),
                mass: 0.0,
                max_speed: 0.0,
                time_to_90_percent: None,
                max_yaw_rate: 0.0,
                jump_apex: 0.0,
                liftoff_count: 0,
                was_grounded: true,
            }
        }
    }

    /// Set up the test environment with ground plane and character body.
    ///
    /// The body is assembled directly (no visual proxy or model scene); only
    /// the physics components the controller reads and writes.
    fn setup_test_environment(mut commands: Commands, mut results: ResMut<MeasurementResults>) {
        commands.spawn((
            RigidBody::Static,
            Collider::cuboid(10000.0, 1.0, 10000.0),
            Transform::from_translation(Vec3::new(0.0, -0.5, 0.0)),
        ));

        let character_name = env::args().nth(1).unwrap_or_else(|| "scout".to_string());
        let definitions = CharacterDefinitions::default();
        let Some(def) = definitions
            .characters
            .iter()
            .find(|def| def.name == character_name)
        else {
            eprintln!("# ERROR: unknown character '{character_name}'");
            eprintln!(
                "# Available: {}",
                definitions
                    .characters
                    .iter()
                    .map(|def| def.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            std::process::exit(1);
        };

        let he = def.half_extents;
        commands.spawn((
            CharacterBody,
            ControllerInput::default(),
            MovementConfig(def.movement.clone()),
            CharacterState::default(),
            RigidBody::Dynamic,
            Collider::cuboid(he.x * 2.0, he.y * 2.0, he.z * 2.0),
            ColliderDensity(def.density),
            LinearDamping(0.4),
            AngularDamping(2.0),
            Transform::from_translation(Vec3::new(0.0, he.y, 0.0)),
            LinearVelocity::default(),
            AngularVelocity::default(),
        ));

        results.character_name = character_name.clone();
        eprintln!("# Simulating character: {character_name}");
    }

    /// Apply the scripted input for the current phase.
    fn apply_scripted_input(
        phase: Res<SimPhase>,
        mut query: Query<&mut ControllerInput, With<CharacterBody>>,
    ) {
        for mut input in &mut query {
            *input = match *phase {
                SimPhase::Drive => ControllerInput {
                    forward: true,
                    ..default()
                },
                SimPhase::Turn => ControllerInput {
                    forward: true,
                    turn_left: true,
                    ..default()
                },
                SimPhase::Jump => ControllerInput {
                    jump: true,
                    ..default()
                },
                SimPhase::Settle | SimPhase::Complete => ControllerInput::default(),
            };
        }
    }

    /// Advance the phase clock, record measurements, and transition phases.
    #[allow(clippy::type_complexity)]
    fn measure_and_track(
        time: Res<Time>,
        mut phase: ResMut<SimPhase>,
        mut clock: ResMut<PhaseClock>,
        mut results: ResMut<MeasurementResults>,
        query: Query<
            (
                &CharacterState,
                &Transform,
                &AngularVelocity,
                &ComputedMass,
                &MovementConfig,
            ),
            With<CharacterBody>,
        >,
    ) {
        let dt = time.delta_secs();
        if dt == 0.0 {
            return;
        }
        clock.0 += dt;

        let Ok((state, transform, angular_velocity, computed_mass, config)) = query.single()
        else {
            return;
        };

        match *phase {
            SimPhase::Settle => {
                if clock.0 >= SETTLE_TIME {
                    results.mass = computed_mass.value();
                    eprintln!("# Mass: {:.2} kg", results.mass);
                    eprintln!("# Running drive test...");
                    *phase = SimPhase::Drive;
                    clock.0 = 0.0;
                }
            }
            SimPhase::Drive => {
                if state.speed > results.max_speed {
                    results.max_speed = state.speed;
                }
                // Terminal speed estimate from force against linear damping.
                let terminal = config.0.move_force / (results.mass * 0.4);
                if results.time_to_90_percent.is_none() && state.speed >= terminal * 0.9 {
                    results.time_to_90_percent = Some(clock.0);
                }
                if clock.0 >= DRIVE_TIME {
                    eprintln!("# Drive test complete, running turn test...");
                    *phase = SimPhase::Turn;
                    clock.0 = 0.0;
                }
            }
            SimPhase::Turn => {
                let yaw_rate = angular_velocity.y.abs();
                if yaw_rate > results.max_yaw_rate {
                    results.max_yaw_rate = yaw_rate;
                }
                if clock.0 >= TURN_TIME {
                    eprintln!("# Turn test complete, running jump test...");
                    results.was_grounded = state.grounded;
                    *phase = SimPhase::Jump;
                    clock.0 = 0.0;
                }
            }
            SimPhase::Jump => {
                if transform.translation.y > results.jump_apex {
                    results.jump_apex = transform.translation.y;
                }
                // A grounded-to-airborne edge is one jump impulse. Holding
                // jump for the whole phase should produce exactly one until
                // the body lands again.
                if results.was_grounded && !state.grounded {
                    results.liftoff_count += 1;
                }
                results.was_grounded = state.grounded;
                if clock.0 >= JUMP_TIME {
                    *phase = SimPhase::Complete;
                }
            }
            SimPhase::Complete => {}
        }
    }

    /// Check for completion and output summary.
    fn check_complete(phase: Res<SimPhase>, results: Res<MeasurementResults>) {
        let SimPhase::Complete = &*phase else {
            return;
        };

        eprintln!();
        eprintln!("# === {} ===", results.character_name);
        eprintln!("# Mass: {:.2} kg", results.mass);
        eprintln!(
            "# Max speed: {:.2} m/s ({:.1} km/h)",
            results.max_speed,
            results.max_speed * 3.6
        );
        if let Some(time) = results.time_to_90_percent {
            eprintln!("# Time to 90% terminal: {time:.2} s");
        } else {
            eprintln!("# Time to 90% terminal: (not reached)");
        }
        eprintln!("# Max yaw rate: {:.2} rad/s", results.max_yaw_rate);
        eprintln!("# Jump apex: {:.2} m", results.jump_apex);
        eprintln!("# Liftoffs during held jump: {}", results.liftoff_count);

        std::process::exit(0);
    }

    /// Entry point for the simulator.
    pub fn run() {
        App::new()
            // Headless plugins: DefaultPlugins without windowing, with headless rendering.
            .add_plugins(
                DefaultPlugins
                    .set(bevy::render::RenderPlugin {
                        render_creation: RenderCreation::Automatic(WgpuSettings {
                            backends: None,
                            ..default()
                        }),
                        ..default()
                    })
                    .disable::<bevy::winit::WinitPlugin>(),
            )
            // Schedule runner for headless loop.
            .add_plugins(ScheduleRunnerPlugin::run_loop(
                std::time::Duration::from_secs_f64(FIXED_TIMESTEP),
            ))
            // Physics with fixed timestep.
            .add_plugins(PhysicsPlugins::default())
            .insert_resource(Gravity(Vec3::NEG_Y * 9.81))
            .insert_resource(Time::<Fixed>::from_seconds(FIXED_TIMESTEP))
            // Simulation resources.
            .init_resource::<SimPhase>()
            .init_resource::<PhaseClock>()
            .init_resource::<MeasurementResults>()
            // Systems. Uses the SAME controller step as the main app.
            .add_systems(Startup, setup_test_environment)
            .add_systems(FixedUpdate, controller_step_system)
            .add_systems(Update, (apply_scripted_input, measure_and_track, check_complete))
            .run();
    }
} // mod sim

fn main() {
    sim::run();
}

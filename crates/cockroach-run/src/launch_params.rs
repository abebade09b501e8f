//! Launch parameter parsing.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;

use crate::camera::CameraMode;

/// Default character selection.
const DEFAULT_CHARACTER: &str = "scout";

/// Launch parameters for the game.
#[derive(Resource, Debug)]
pub struct LaunchParams {
    /// Name of the character to play.
    pub character: String,
    /// Initial camera mode.
    pub camera_mode: CameraMode,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            character: DEFAULT_CHARACTER.to_string(),
            camera_mode: CameraMode::default(),
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Physics-driven cockroach sandbox")]
    struct CliArgs {
        /// Character to play.
        #[arg(long, default_value = DEFAULT_CHARACTER)]
        character: String,

        /// Initial camera mode.
        #[arg(long, value_enum, default_value = "follow")]
        mode: CameraMode,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            character: args.character,
            camera_mode: args.mode,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}

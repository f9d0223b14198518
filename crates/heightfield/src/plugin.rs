use bevy::log::error;
use bevy::prelude::*;

use crate::config::TerrainConfig;
use crate::engine::TerrainEngine;

/// Generates the terrain once at startup from the `TerrainConfig` resource
/// and inserts the finished `TerrainEngine` for mesh-building systems to read.
///
/// Insert a `TerrainConfig` before the first update to override the defaults.
pub struct HeightfieldPlugin;

impl Plugin for HeightfieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainConfig>()
            .add_systems(Startup, generate_heightfield);
    }
}

pub fn generate_heightfield(mut commands: Commands, config: Res<TerrainConfig>) {
    match TerrainEngine::from_config(config.clone()) {
        Ok(engine) => commands.insert_resource(engine),
        Err(e) => error!("Heightfield generation failed: {}", e),
    }
}

//! # TestShipyard — headless integration test harness
//!
//! A fluent builder wrapping `bevy::app::App` + `SimulationPlugin` for
//! exercising detection and transforms without any renderer. Builder methods
//! lay out worlds and ships; action methods send the request events and tick
//! the app; query methods read the resulting ECS state.

mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::world::{Universe, WorldId};
use crate::SimulationPlugin;

/// The id `TestShipyard` seeds by default; most tests live entirely in it.
pub const MAIN_WORLD: WorldId = WorldId(0);

pub struct TestShipyard {
    app: App,
}

impl Default for TestShipyard {
    fn default() -> Self {
        Self::new()
    }
}

impl TestShipyard {
    /// An empty universe with one world and default detection config.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        app.world_mut()
            .resource_mut::<Universe>()
            .ensure_world(MAIN_WORLD);
        Self { app }
    }

    /// Run one full update: request handling, message delivery, observer
    /// notification flush.
    pub fn tick(&mut self) {
        self.app.update();
    }

    pub fn app(&mut self) -> &mut App {
        &mut self.app
    }
}

//! Headless demo: builds a small ship in an empty world, detects it, then
//! flies it around while logging what happened to the captain.

use bevy::log::LogPlugin;
use bevy::math::{DVec3, IVec3};
use bevy::prelude::*;

use simulation::block::Block;
use simulation::craft::Craft;
use simulation::detection::DetectCraftRequest;
use simulation::messages::MessageLog;
use simulation::riders::{Player, Pose};
use simulation::rotation::Rotation;
use simulation::transform::{MoveCraftRequest, RotateCraftRequest};
use simulation::world::{Universe, WorldId};
use simulation::SimulationPlugin;

const OVERWORLD: WorldId = WorldId(0);

fn main() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .add_plugins(SimulationPlugin);

    let (captain, ship) = build_shipyard(app.world_mut());

    app.world_mut().send_event(DetectCraftRequest { craft: ship });
    app.update();

    app.world_mut().send_event(MoveCraftRequest {
        craft: ship,
        offset: IVec3::new(0, 5, 0),
        target_world: None,
    });
    app.update();

    app.world_mut().send_event(RotateCraftRequest {
        craft: ship,
        rotation: Rotation::Clockwise90,
    });
    app.update();

    report(app.world(), captain, ship);
}

/// A 3x1x3 deck with a helm in the middle, plus its captain standing on it.
fn build_shipyard(world: &mut World) -> (Entity, Entity) {
    let origin = IVec3::new(0, 65, 0);
    {
        let mut universe = world.resource_mut::<Universe>();
        let overworld = universe.ensure_world(OVERWORLD);
        for x in -1..=1 {
            for z in -1..=1 {
                overworld.set_block_fast(origin + IVec3::new(x, -1, z), Block::Deck);
            }
        }
        overworld.set_block_fast(origin, Block::Helm);
    }

    let captain = world
        .spawn((
            Pose::at(origin.as_dvec3() + DVec3::new(0.5, 0.0, 0.5), OVERWORLD),
            Player,
        ))
        .id();
    let mut craft = Craft::new(origin, OVERWORLD, captain);
    craft.passengers.push(captain);
    let ship = world.spawn(craft).id();
    (captain, ship)
}

fn report(world: &World, captain: Entity, ship: Entity) {
    let Some(craft) = world.get::<Craft>(ship) else {
        error!("demo ship despawned");
        return;
    };
    info!(
        "ship settled at {:?} with {} blocks",
        craft.origin,
        craft.block_count()
    );
    for line in world.resource::<MessageLog>().for_actor(captain) {
        info!("captain saw: {line}");
    }
}

//! Deploy module — экипировка supply drops автотурелями
//!
//! Пайплайн (orchestrator → leaf):
//! 1. `systems::deploy_auto_turret` — guards + последовательность шагов
//! 2. `spawner::spawn_auto_turret` — prefab спавн + sanitize
//! 3. `assembler::add_weapon_to_turret` — weapon + attachments + clip ammo
//! 4. `ammo::load_reserve_ammo` — reserve стаки по слотам 1..N-1
//! 5. `tracker::TurretRegistry` — учёт + teardown на shutdown
//!
//! Всё исполняется на одном simulation-треде; единственная suspension
//! point — one-tick deferral между спавном drop'а и его экипировкой.

use bevy::prelude::*;

pub mod ammo;
pub mod assembler;
pub mod queue;
pub mod spawner;
pub mod systems;
pub mod tracker;

mod pipeline_tests;

// Re-export основных типов
pub use ammo::load_reserve_ammo;
pub use assembler::{add_weapon_to_turret, refresh_magazine_capacity};
pub use queue::DeferredEquips;
pub use spawner::{hide_io_ports, remove_problematic_components, spawn_auto_turret};
pub use systems::{deploy_auto_turret, equip_existing_drops};
pub use tracker::{teardown_all, ShutdownRequested, TurretRegistry};

use crate::world::supply_drop::SupplyDropSpawned;

/// Deploy plugin — события, ресурсы и системы пайплайна
///
/// Порядок в FixedUpdate:
/// 1. `run_deferred_equips` — дрен очереди (задачи прошлого тика)
/// 2. `queue_spawned_drops` — enqueue новых drops (исполнятся на следующем)
/// 3. `handle_shutdown` — bulk teardown по shutdown event
pub struct DeployPlugin;

impl Plugin for DeployPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SupplyDropSpawned>()
            .add_event::<ShutdownRequested>()
            .init_resource::<TurretRegistry>()
            .init_resource::<DeferredEquips>()
            .add_systems(Startup, systems::equip_existing_drops)
            .add_systems(
                FixedUpdate,
                (
                    systems::run_deferred_equips,
                    systems::queue_spawned_drops,
                    tracker::handle_shutdown,
                )
                    .chain(),
            );
    }
}

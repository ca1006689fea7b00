//! SKYDROP Simulation Core
//!
//! ECS-ядро на Bevy 0.16: автоматическая экипировка supply drop'ов
//! автономными турелями.
//!
//! Архитектура:
//! - `world` = host-модель (entities, контейнеры, items, турель)
//! - `deploy` = пайплайн экипировки (spawn → assemble → distribute → track)
//! - host после включения турели полностью владеет её боевым поведением

use bevy::prelude::*;

// Публичные модули
pub mod config;
pub mod deploy;
pub mod item_system;
pub mod logger;
pub mod world;

// Re-export базовых типов для удобства
pub use config::{AmmoSpec, TurretConfig};
pub use deploy::{
    deploy_auto_turret, teardown_all, DeferredEquips, DeployPlugin, ShutdownRequested,
    TurretRegistry,
};
pub use item_system::{ItemDefinitions, ItemId, ItemStack};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use world::{
    spawn_supply_drop, AutoTurret, ItemContainer, Magazine, SupplyDrop, SupplyDropSpawned,
};

/// Главный plugin симуляции (конфиг + definitions + deploy пайплайн)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Explicit context: config и definitions создаются на старте,
            // живут до shutdown, никаких static'ов
            .init_resource::<ItemDefinitions>()
            .init_resource::<TurretConfig>()
            .add_plugins(DeployPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);

    app
}

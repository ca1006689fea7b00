//! Supply drop — airdrop контейнер, к которому крепится турель

use bevy::prelude::*;

/// Airdrop контейнер
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SupplyDrop {
    /// Контейнер уже можно лутать → экипировке не подлежит
    pub lootable: bool,
}

/// Scheduled behavior контейнера: проверка "night light" на следующих тиках.
/// Deferred equip снимает маркер — свет конфликтует с посаженной турелью.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NightLightCheck;

/// Host event: в мире появился новый supply drop
#[derive(Event, Debug, Clone)]
pub struct SupplyDropSpawned {
    pub entity: Entity,
}

/// Заспавнить supply drop и отправить host event
///
/// Используется headless runner'ом и тестами как вход пайплайна.
pub fn spawn_supply_drop(world: &mut World, position: Vec3) -> Entity {
    let entity = world
        .spawn((
            SupplyDrop { lootable: false },
            NightLightCheck,
            Transform::from_translation(position),
        ))
        .id();

    world.send_event(SupplyDropSpawned { entity });
    entity
}

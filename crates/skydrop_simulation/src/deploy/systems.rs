//! Deployment orchestrator
//!
//! Решает КОГДА экипировать контейнер и прогоняет пайплайн:
//! spawn → sanitize → assemble → distribute → enable → register.
//!
//! Входы:
//! - startup: one-time скан мира на уже существующие drops
//! - `SupplyDropSpawned`: deferred на один тик через `DeferredEquips`
//!
//! Все guards допускают исчезновение entity между тиками — отложенный
//! шаг на мёртвом drop'е становится no-op, не ошибкой.

use bevy::prelude::*;

use crate::config::TurretConfig;
use crate::deploy::ammo::load_reserve_ammo;
use crate::deploy::assembler::add_weapon_to_turret;
use crate::deploy::queue::DeferredEquips;
use crate::deploy::spawner::spawn_auto_turret;
use crate::deploy::tracker::TurretRegistry;
use crate::logger::log;
use crate::world::supply_drop::{NightLightCheck, SupplyDrop, SupplyDropSpawned};
use crate::world::turret::{
    ensure_reloaded, find_child_turret, initiate_startup, update_total_ammo, AutoTurret,
    TURRET_LOCAL_POSITION,
};

/// Экипировать supply drop, если он всё ещё подходит
///
/// No-op если drop отсутствует, уже lootable или уже несёт турель
/// (повторный вызов на том же контейнере эквивалентен одному — idempotent).
pub fn deploy_auto_turret(world: &mut World, supply_drop: Entity) {
    if world.get_entity(supply_drop).is_err() {
        return;
    }
    let Some(drop_state) = world.get::<SupplyDrop>(supply_drop) else {
        return;
    };
    if drop_state.lootable {
        return;
    }
    if find_child_turret(world, supply_drop).is_some() {
        return;
    }

    let Some(turret) = spawn_auto_turret(
        world,
        supply_drop,
        TURRET_LOCAL_POSITION,
        Quat::IDENTITY,
    ) else {
        // Spawn failure: экипировку этого контейнера прерываем, турель
        // не регистрируем
        return;
    };

    // Частичный провал сборки оружия не отменяет остальное
    add_weapon_to_turret(world, turret);

    load_reserve_ammo(world, turret);
    update_total_ammo(world, turret);
    ensure_reloaded(world, turret);

    let peacekeeper = world.resource::<TurretConfig>().peacekeeper;
    if let Some(mut state) = world.get_mut::<AutoTurret>(turret) {
        state.peacekeeper = peacekeeper;
    }
    initiate_startup(world, turret);

    world.resource_mut::<TurretRegistry>().register(turret);
    log(&format!("✅ Turret deployed на drop {:?}", supply_drop));
}

/// Startup system: one-time скан мира на pre-existing drops
///
/// Лутабельные и уже экипированные пропускаются (guards внутри
/// `deploy_auto_turret` это дублируют, но скан не плодит лишних попыток).
pub fn equip_existing_drops(world: &mut World) {
    let drops: Vec<Entity> = world
        .query_filtered::<Entity, With<SupplyDrop>>()
        .iter(world)
        .collect();

    for supply_drop in drops {
        deploy_auto_turret(world, supply_drop);
    }
}

/// System: новый drop → в очередь на следующий тик
///
/// Уже lootable drops отсеиваются сразу (deferred шаг перепроверит ещё раз).
pub fn queue_spawned_drops(
    mut events: EventReader<SupplyDropSpawned>,
    drops: Query<&SupplyDrop>,
    mut queue: ResMut<DeferredEquips>,
) {
    for spawned in events.read() {
        let Ok(drop_state) = drops.get(spawned.entity) else {
            continue;
        };
        if drop_state.lootable {
            continue;
        }
        queue.enqueue(spawned.entity);
    }
}

/// System (exclusive): дрен очереди — экипировка отложенных drops
///
/// Стоит в цепочке ПЕРЕД `queue_spawned_drops`, поэтому задержка — ровно
/// один тик. Заодно снимает запланированный night-light check.
pub fn run_deferred_equips(world: &mut World) {
    let due = world.resource_mut::<DeferredEquips>().drain();
    for supply_drop in due {
        if world.get_entity(supply_drop).is_err() {
            // Drop умер до отложенного шага — безопасный no-op
            continue;
        }
        deploy_auto_turret(world, supply_drop);
        world.entity_mut(supply_drop).remove::<NightLightCheck>();
    }
}

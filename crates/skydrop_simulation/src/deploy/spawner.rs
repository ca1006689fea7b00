//! Turret spawner & sanitizer
//!
//! Спавнит турель из fixed prefab, парентит к supply drop и вычищает
//! всё, что конфликтует с ролью "намертво прикрученный аксессуар":
//! - не-trigger коллайдеры (физически не мешает и не ловит чужой targeting)
//! - ground behaviors (бессмысленны при постоянном parent'е)
//! - electric порты ретипизируются в Generic (вне power/logic grid)

use bevy::prelude::*;

use crate::logger::log_warning;
use crate::world::turret::{
    spawn_prefab, ColliderShape, DestroyOnGroundMissing, GroundWatch, IoPorts, IoSlotType,
    PREFAB_AUTO_TURRET,
};

/// Заспавнить и санитизировать турель на supply drop
///
/// `None` = prefab creation провалился; caller прерывает экипировку
/// этого контейнера (fatal только для текущей попытки).
pub fn spawn_auto_turret(
    world: &mut World,
    supply_drop: Entity,
    local_position: Vec3,
    local_rotation: Quat,
) -> Option<Entity> {
    let Some(turret) = spawn_prefab(world, PREFAB_AUTO_TURRET, local_position, local_rotation)
    else {
        log_warning(&format!(
            "⚠️ Prefab creation failed: {}",
            PREFAB_AUTO_TURRET
        ));
        return None;
    };

    world.entity_mut(turret).insert(ChildOf(supply_drop));

    remove_problematic_components(world, turret);
    hide_io_ports(world, turret);

    Some(turret)
}

/// Убрать не-trigger коллайдеры и passive ground behaviors
pub fn remove_problematic_components(world: &mut World, entity: Entity) {
    let children: Vec<Entity> = world
        .get::<Children>(entity)
        .map(|children| children.iter().collect())
        .unwrap_or_default();

    for child in children {
        if let Some(collider) = world.get::<ColliderShape>(child) {
            if !collider.trigger {
                world.despawn(child);
            }
        }
    }

    world
        .entity_mut(entity)
        .remove::<DestroyOnGroundMissing>()
        .remove::<GroundWatch>();
}

/// Ретипизировать все IO порты в Generic — entity выпадает из power grid
pub fn hide_io_ports(world: &mut World, entity: Entity) {
    let Some(mut ports) = world.get_mut::<IoPorts>(entity) else {
        return;
    };
    for input in ports.inputs.iter_mut() {
        *input = IoSlotType::Generic;
    }
    for output in ports.outputs.iter_mut() {
        *output = IoSlotType::Generic;
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Reserve ammo distributor
//!
//! Раскладывает configured reserve стаки по слотам инвентаря, начиная
//! со слота 1 (слот 0 зарезервирован под weapon).
//!
//! # Slot semantics
//! - слот за пределами capacity-1 → раздача останавливается целиком
//! - amount <= 0 или неизвестный shortname → spec пропускается, слот НЕ
//!   расходуется
//! - размер стака клампится к max_stack типа
//! - если item не приземлился ровно в целевой слот (merge в существующий
//!   стак), occupant'у форсируется расчётный amount, свежий item
//!   освобождается — дубликаты исключены
//! - после каждого consumed spec'а слот строго +1

use bevy::prelude::*;

use crate::config::TurretConfig;
use crate::item_system::{create_item_from_def, remove_item, ItemDefinitions, ItemStack};
use crate::world::container::{move_to_container, ItemContainer};
use crate::world::turret::WEAPON_SLOT;

/// Загрузить reserve ammo в инвентарь турели
pub fn load_reserve_ammo(world: &mut World, turret: Entity) {
    let config = world.resource::<TurretConfig>().clone();
    if config.reserve_ammo.is_empty() {
        return;
    }

    let Some(container) = world.get::<ItemContainer>(turret) else {
        return;
    };
    let capacity = container.capacity();
    if capacity <= WEAPON_SLOT + 1 {
        // Нет ни одного reserve слота
        return;
    }
    let maximum_available_slot = capacity - 1;

    let mut current_slot = WEAPON_SLOT + 1;
    for ammo in &config.reserve_ammo {
        if current_slot > maximum_available_slot {
            break;
        }
        if ammo.amount <= 0 {
            continue;
        }
        let Some(def) = world
            .resource::<ItemDefinitions>()
            .get(&ammo.shortname.as_str().into())
            .cloned()
        else {
            continue;
        };

        let amount_to_add = (ammo.amount as u32).min(def.max_stack);
        let item = create_item_from_def(world, &def, amount_to_add);

        if !move_to_container(world, item, turret, current_slot) {
            // Item не приземлился (merge или отказ): форсируем occupant'у
            // расчётный amount и освобождаем свежий item
            let occupant = world
                .get::<ItemContainer>(turret)
                .and_then(|container| container.slot(current_slot));
            if let Some(occupant) = occupant {
                if let Some(mut stack) = world.get_mut::<ItemStack>(occupant) {
                    stack.amount = amount_to_add;
                }
            }
            remove_item(world, item);
        }

        current_slot += 1;
    }
}

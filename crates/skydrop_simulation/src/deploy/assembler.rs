//! Weapon assembler
//!
//! Собирает оружие с attachments и сажает его в слот 0 турели.
//!
//! # Failure semantics (всё recoverable)
//! - attachment не создался / не влез → free attachment, остальные идут дальше
//! - weapon не встал в слот 0 → free weapon, `None` (турель остаётся без
//!   оружия, но живёт)
//! - clip ammo shortname не резолвится → магазин просто не заряжаем
//!
//! Attachments меняют ёмкость магазина, поэтому пересчёт — синхронный,
//! строго до заряжания clip ammo (capacity всегда побеждает запрошенное
//! количество).

use bevy::prelude::*;

use crate::config::TurretConfig;
use crate::item_system::{
    create_item, move_to_contents, remove_item, ItemContents, ItemDefinitions, ItemStack,
};
use crate::logger::{log, log_warning};
use crate::world::container::move_to_container;
use crate::world::turret::{update_attached_weapon, Magazine, WEAPON_SLOT};

/// Собрать weapon и вставить в слот 0 турели
///
/// `None` = weapon не создался или не встал в слот; турель остаётся
/// weaponless (но зарегистрированной — это забота orchestrator'а).
pub fn add_weapon_to_turret(world: &mut World, turret: Entity) -> Option<Entity> {
    let config = world.resource::<TurretConfig>().clone();

    let Some(weapon) = create_item(world, &config.weapon_shortname) else {
        log_warning(&format!(
            "⚠️ Weapon shortname не резолвится: {}",
            config.weapon_shortname
        ));
        return None;
    };

    // Attachments: best-effort, одиночный fail не прерывает сборку
    for shortname in &config.attachment_shortnames {
        let Some(attachment) = create_item(world, shortname) else {
            log_warning(&format!("⚠️ Attachment shortname не резолвится: {}", shortname));
            continue;
        };
        if !move_to_contents(world, attachment, weapon) {
            remove_item(world, attachment);
        }
    }

    if !move_to_container(world, weapon, turret, WEAPON_SLOT) {
        remove_item(world, weapon);
        return None;
    }

    // Projectile weapon: пересчёт магазина + refresh presentation — сразу,
    // не deferred (clip ammo грузится против уже актуальной ёмкости)
    if world.get::<Magazine>(weapon).is_some() {
        refresh_magazine_capacity(world, weapon);
        update_attached_weapon(world, turret);

        if let Some(clip) = &config.clip_ammo {
            load_clip_ammo(world, weapon, &clip.shortname, clip.amount);
        }
    }

    log(&format!("✅ Weapon {} собран в слот 0", config.weapon_shortname));
    Some(weapon)
}

/// Пересчитать ёмкость магазина: база из definition + Σ attachment бонусов
///
/// Уже заряженное клампится к новой ёмкости (бонус может быть отрицательным).
pub fn refresh_magazine_capacity(world: &mut World, weapon: Entity) {
    let capacity = {
        let Some(stack) = world.get::<ItemStack>(weapon) else {
            return;
        };
        let defs = world.resource::<ItemDefinitions>();
        let Some(def) = defs.get(&stack.def) else {
            return;
        };
        let base = def.magazine_capacity as i32;

        let bonus: i32 = world
            .get::<ItemContents>(weapon)
            .map(|contents| {
                contents
                    .items
                    .iter()
                    .filter_map(|item| world.get::<ItemStack>(*item))
                    .filter_map(|stack| defs.get(&stack.def))
                    .map(|def| def.magazine_bonus)
                    .sum()
            })
            .unwrap_or(0);

        (base + bonus).max(1) as u32
    };

    if let Some(mut magazine) = world.get_mut::<Magazine>(weapon) {
        magazine.capacity = capacity;
        magazine.contents = magazine.contents.min(capacity);
    }
}

/// Зарядить clip ammo: тип + count = min(capacity, requested)
fn load_clip_ammo(world: &mut World, weapon: Entity, shortname: &str, amount: i32) {
    let Some(def) = world
        .resource::<ItemDefinitions>()
        .get(&shortname.into())
        .cloned()
    else {
        // Unknown ammo — skip, остальной пайплайн не прерываем
        log_warning(&format!("⚠️ Clip ammo shortname не резолвится: {}", shortname));
        return;
    };

    if let Some(mut magazine) = world.get_mut::<Magazine>(weapon) {
        magazine.ammo_type = Some(def.id.clone());
        magazine.contents = amount.max(0).min(magazine.capacity as i32) as u32;
    }
}

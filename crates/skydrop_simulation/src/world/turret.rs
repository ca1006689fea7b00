//! Auto turret — host entity модель + control surface
//!
//! # Архитектура
//!
//! Турель — entity с fixed-slot инвентарём (слот 0 = weapon, 1..N-1 =
//! reserve ammo) и control surface: enable/startup, peacekeeper flag,
//! refresh attached weapon, пересчёт total ammo. Боевое поведение после
//! включения — ответственность host-симуляции, не этого crate.
//!
//! Prefab-спавн — единственная fallible конверсия на границе:
//! `spawn_prefab` возвращает `Option<Entity>` вместо nullable cast.

use bevy::prelude::*;

use crate::item_system::{ItemId, ItemStack};
use crate::world::container::ItemContainer;

/// Prefab identifier турели (fixed)
pub const PREFAB_AUTO_TURRET: &str = "assets/prefabs/npc/autoturret/autoturret_deployed.prefab";

/// Локальный offset турели относительно supply drop (крыша контейнера)
pub const TURRET_LOCAL_POSITION: Vec3 = Vec3::new(-0.09, 2.60, -0.07);

/// Слот инвентаря, зарезервированный под weapon
pub const WEAPON_SLOT: usize = 0;

/// Ёмкость инвентаря турели (1 weapon + 6 reserve)
pub const TURRET_INVENTORY_CAPACITY: usize = 7;

// ============================================================================
// Components
// ============================================================================

/// Autonomous turret state
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AutoTurret {
    /// Peacekeeper targeting mode
    pub peacekeeper: bool,
    /// Включена ли турель (InitiateStartup)
    pub online: bool,
    /// Суммарный боезапас (магазин + reserve того же типа)
    pub total_ammo: u32,
    /// Presentation state: какой weapon сейчас примонтирован
    pub attached_weapon: Option<Entity>,
}

impl Default for AutoTurret {
    fn default() -> Self {
        Self {
            peacekeeper: false,
            online: false,
            total_ammo: 0,
            attached_weapon: None,
        }
    }
}

/// Магазин projectile-оружия
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Magazine {
    /// Ёмкость (может меняться attachments)
    pub capacity: u32,
    /// Тип заряженного ammo
    pub ammo_type: Option<ItemId>,
    /// Заряжено сейчас
    pub contents: u32,
}

impl Magazine {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            ammo_type: None,
            contents: 0,
        }
    }
}

/// Collider host-модели (child entity турели)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ColliderShape {
    /// Trigger volume (targeting) против физического тела
    pub trigger: bool,
}

/// Passive behavior: самоуничтожение при потере опоры
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DestroyOnGroundMissing;

/// Passive behavior: стабилизация по земле
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GroundWatch;

/// Тип электрического порта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum IoSlotType {
    /// Участвует в power/logic grid
    Electric,
    /// Инертный порт — grid его игнорирует
    Generic,
}

/// Электрические входы/выходы entity
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct IoPorts {
    pub inputs: Vec<IoSlotType>,
    pub outputs: Vec<IoSlotType>,
}

// ============================================================================
// Prefab spawn (fallible boundary)
// ============================================================================

/// Создать entity по prefab identifier
///
/// `None` если prefab неизвестен — caller прерывает свою операцию,
/// не роняя симуляцию.
pub fn spawn_prefab(
    world: &mut World,
    prefab: &str,
    position: Vec3,
    rotation: Quat,
) -> Option<Entity> {
    match prefab {
        PREFAB_AUTO_TURRET => Some(spawn_turret_prefab(world, position, rotation)),
        _ => None,
    }
}

/// Собрать турель в том виде, как её отдаёт host prefab:
/// физическое тело + targeting trigger, ground behaviors, electric порты.
fn spawn_turret_prefab(world: &mut World, position: Vec3, rotation: Quat) -> Entity {
    let turret = world
        .spawn((
            AutoTurret::default(),
            ItemContainer::new(TURRET_INVENTORY_CAPACITY),
            IoPorts {
                inputs: vec![IoSlotType::Electric],
                outputs: vec![IoSlotType::Electric],
            },
            DestroyOnGroundMissing,
            GroundWatch,
            Transform::from_translation(position).with_rotation(rotation),
        ))
        .id();

    // Collider children: solid body + targeting trigger
    let body = world.spawn(ColliderShape { trigger: false }).id();
    let targeting = world.spawn(ColliderShape { trigger: true }).id();
    world.entity_mut(body).insert(ChildOf(turret));
    world.entity_mut(targeting).insert(ChildOf(turret));

    turret
}

// ============================================================================
// Control surface
// ============================================================================

/// Weapon в слоте 0 инвентаря турели (вместе с его магазином)
pub fn turret_weapon(world: &World, turret: Entity) -> Option<Entity> {
    let container = world.get::<ItemContainer>(turret)?;
    let weapon = container.slot(WEAPON_SLOT)?;
    world.get::<Magazine>(weapon).map(|_| weapon)
}

/// Обновить presentation state "какой weapon примонтирован"
pub fn update_attached_weapon(world: &mut World, turret: Entity) {
    let weapon = turret_weapon(world, turret);
    if let Some(mut state) = world.get_mut::<AutoTurret>(turret) {
        state.attached_weapon = weapon;
    }
}

/// Пересчитать суммарный боезапас: магазин + reserve стаки того же типа
pub fn update_total_ammo(world: &mut World, turret: Entity) {
    let total = match turret_weapon(world, turret) {
        None => 0,
        Some(weapon) => {
            let Some(magazine) = world.get::<Magazine>(weapon) else {
                return;
            };
            match magazine.ammo_type.clone() {
                None => magazine.contents,
                Some(ammo_type) => {
                    magazine.contents + reserve_ammo_count(world, turret, &ammo_type)
                }
            }
        }
    };

    if let Some(mut state) = world.get_mut::<AutoTurret>(turret) {
        state.total_ammo = total;
    }
}

/// Сколько ammo данного типа лежит в reserve слотах
pub fn reserve_ammo_count(world: &World, turret: Entity, ammo_type: &ItemId) -> u32 {
    let Some(container) = world.get::<ItemContainer>(turret) else {
        return 0;
    };
    let mut total = 0;
    for slot in (WEAPON_SLOT + 1)..container.capacity() {
        let Some(item) = container.slot(slot) else {
            continue;
        };
        if let Some(stack) = world.get::<ItemStack>(item) {
            if stack.def == *ammo_type {
                total += stack.amount;
            }
        }
    }
    total
}

/// Дозарядить пустой магазин из reserve стаков того же типа
///
/// No-op если магазин не пуст, тип ammo не задан или reserve пуст.
pub fn ensure_reloaded(world: &mut World, turret: Entity) {
    let Some(weapon) = turret_weapon(world, turret) else {
        return;
    };
    let (ammo_type, needed) = {
        let Some(magazine) = world.get::<Magazine>(weapon) else {
            return;
        };
        if magazine.contents > 0 {
            return;
        }
        let Some(ammo_type) = magazine.ammo_type.clone() else {
            return;
        };
        (ammo_type, magazine.capacity)
    };

    let loaded = drain_reserve_ammo(world, turret, &ammo_type, needed);
    if loaded == 0 {
        return;
    }
    if let Some(mut magazine) = world.get_mut::<Magazine>(weapon) {
        magazine.contents = loaded;
    }
}

/// Забрать до `wanted` патронов из reserve слотов (стаки уменьшаются,
/// опустевшие despawn'ятся). Возвращает фактически забранное количество.
fn drain_reserve_ammo(world: &mut World, turret: Entity, ammo_type: &ItemId, wanted: u32) -> u32 {
    let Some(container) = world.get::<ItemContainer>(turret) else {
        return 0;
    };
    let capacity = container.capacity();

    let mut taken = 0;
    for slot in (WEAPON_SLOT + 1)..capacity {
        if taken >= wanted {
            break;
        }
        let Some(item) = world
            .get::<ItemContainer>(turret)
            .and_then(|container| container.slot(slot))
        else {
            continue;
        };
        let Some(stack) = world.get::<ItemStack>(item) else {
            continue;
        };
        if stack.def != *ammo_type {
            continue;
        }

        let take = stack.amount.min(wanted - taken);
        taken += take;

        let mut emptied = false;
        if let Some(mut stack) = world.get_mut::<ItemStack>(item) {
            stack.amount -= take;
            emptied = stack.amount == 0;
        }
        if emptied {
            crate::item_system::remove_item(world, item);
        }
    }
    taken
}

/// Enable/startup transition
pub fn initiate_startup(world: &mut World, turret: Entity) {
    if let Some(mut state) = world.get_mut::<AutoTurret>(turret) {
        state.online = true;
    }
}

/// Найти среди детей entity турель (idempotency guard экипировки)
pub fn find_child_turret(world: &World, parent: Entity) -> Option<Entity> {
    let children = world.get::<Children>(parent)?;
    children
        .iter()
        .find(|child| world.get::<AutoTurret>(*child).is_some())
}

// ============================================================================
// Tests
// ============================================================================

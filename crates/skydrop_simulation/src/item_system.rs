//! Item System — базовая инфраструктура для предметов
//!
//! # Архитектура
//!
//! **ItemDefinition** — статический blueprint (shortname + category + limits):
//! - Хранится в `ItemDefinitions` resource (HashMap lookup)
//! - Immutable данные (max_stack, magazine capacity, attachment bonus)
//! - Создаются hardcoded в `ItemDefinitions::default()` (позже из RON)
//!
//! **Item entity** — runtime конкретный предмет:
//! - `ItemStack` компонент (def id + amount)
//! - Weapons дополнительно несут `ItemContents` (контейнер attachments)
//!   и `Magazine` (см. `world::turret`)
//! - Слотовое владение — через `InContainer` (см. `world::container`)
//!
//! Операции над item entity — свободные функции над `&mut World`:
//! пайплайн экипировки строго последовательный, поэтому прямой доступ
//! к World честнее, чем deferred Commands.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::world::container::detach_from_container;
use crate::world::turret::Magazine;

// ============================================================================
// ItemId
// ============================================================================

/// Item identifier (shortname, unique string ID)
///
/// # Examples
/// - "rifle.ak"
/// - "ammo.rifle"
/// - "weapon.mod.lasersight"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// ItemCategory
// ============================================================================

/// Категория предмета
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub enum ItemCategory {
    /// Weapon (projectile = есть магазин и clip ammo)
    Weapon { projectile: bool },
    /// Ammunition (стакается в reserve слотах)
    Ammo,
    /// Weapon modification (живёт в contents оружия)
    Attachment,
}

// ============================================================================
// ItemDefinition (статические данные)
// ============================================================================

/// Static item definition (blueprint)
///
/// Immutable данные, хранятся в `ItemDefinitions` resource.
#[derive(Clone, Debug, Reflect)]
pub struct ItemDefinition {
    /// Unique shortname
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Категория
    pub category: ItemCategory,
    /// Максимальный размер стака в одном слоте (>= 1)
    pub max_stack: u32,
    /// Базовая ёмкость магазина (projectile weapons)
    pub magazine_capacity: u32,
    /// Дельта к ёмкости магазина host-оружия (attachments, может быть < 0)
    pub magazine_bonus: i32,
    /// Ёмкость contents-контейнера (attachment слоты оружия)
    pub attachment_slots: usize,
}

impl ItemDefinition {
    /// Projectile weapon preset
    pub fn projectile_weapon(
        id: &str,
        name: &str,
        magazine_capacity: u32,
        attachment_slots: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            category: ItemCategory::Weapon { projectile: true },
            max_stack: 1,
            magazine_capacity,
            magazine_bonus: 0,
            attachment_slots,
        }
    }

    /// Ammo preset
    pub fn ammo(id: &str, name: &str, max_stack: u32) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            category: ItemCategory::Ammo,
            max_stack,
            magazine_capacity: 0,
            magazine_bonus: 0,
            attachment_slots: 0,
        }
    }

    /// Attachment preset
    pub fn attachment(id: &str, name: &str, magazine_bonus: i32) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            category: ItemCategory::Attachment,
            max_stack: 1,
            magazine_capacity: 0,
            magazine_bonus,
            attachment_slots: 0,
        }
    }

    pub fn is_projectile_weapon(&self) -> bool {
        matches!(self.category, ItemCategory::Weapon { projectile: true })
    }
}

// ============================================================================
// Item entity components
// ============================================================================

/// Runtime item stack (конкретный предмет в мире)
///
/// Запись amount через `Mut<ItemStack>` проходит сквозь change detection —
/// это и есть "mark dirty" для host-синхронизации.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ItemStack {
    /// Ссылка на definition
    pub def: ItemId,
    /// Размер стака
    pub amount: u32,
}

/// Внутренний контейнер предмета (attachments оружия)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ItemContents {
    /// Entity id каждого вложенного предмета
    pub items: Vec<Entity>,
    /// Ёмкость (attachment слоты)
    pub capacity: usize,
}

impl ItemContents {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

// ============================================================================
// Item operations
// ============================================================================

/// Создать item entity по shortname (amount = 1)
///
/// `None` если shortname не резолвится — caller решает, fatal это или skip.
pub fn create_item(world: &mut World, shortname: &str) -> Option<Entity> {
    let def = world
        .resource::<ItemDefinitions>()
        .get(&shortname.into())?
        .clone();
    Some(create_item_from_def(world, &def, 1))
}

/// Создать item entity из уже известного definition
pub fn create_item_from_def(world: &mut World, def: &ItemDefinition, amount: u32) -> Entity {
    let item = world
        .spawn(ItemStack {
            def: def.id.clone(),
            amount,
        })
        .id();

    // Projectile weapon несёт магазин + attachment контейнер
    if def.is_projectile_weapon() {
        world.entity_mut(item).insert((
            Magazine::new(def.magazine_capacity),
            ItemContents::new(def.attachment_slots),
        ));
    }

    item
}

/// Переместить item в contents другого предмета (attachment → weapon)
///
/// `false` если у host нет contents или слоты кончились; item не трогаем.
pub fn move_to_contents(world: &mut World, item: Entity, host: Entity) -> bool {
    let Some(contents) = world.get::<ItemContents>(host) else {
        return false;
    };
    if contents.is_full() {
        return false;
    }

    if let Some(mut contents) = world.get_mut::<ItemContents>(host) {
        contents.items.push(item);
    }
    // ChildOf — чтобы free оружия рекурсивно забирал attachments
    world.entity_mut(item).insert(ChildOf(host));
    true
}

/// Удалить (free) item entity вместе с вложенным содержимым
///
/// Идемпотентно: повторный вызов на уже despawned entity — no-op.
pub fn remove_item(world: &mut World, item: Entity) {
    if world.get_entity(item).is_err() {
        return;
    }
    detach_from_container(world, item);
    world.despawn(item);
}

// ============================================================================
// ItemDefinitions (Resource)
// ============================================================================

/// Item definitions lookup table (resource)
///
/// Хранит все статические данные предметов, создаётся один раз на старте.
#[derive(Resource, Clone, Debug)]
pub struct ItemDefinitions {
    definitions: HashMap<ItemId, ItemDefinition>,
}

impl ItemDefinitions {
    /// Создать пустой registry
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Получить definition по ID
    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.definitions.get(id)
    }

    /// Максимальный стак для типа (1 если тип неизвестен)
    pub fn max_stack(&self, id: &ItemId) -> u32 {
        self.get(id).map(|def| def.max_stack).unwrap_or(1)
    }

    /// Добавить definition
    pub fn add(&mut self, definition: ItemDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }
}

impl Default for ItemDefinitions {
    /// Hardcoded definitions (базовый item set)
    fn default() -> Self {
        let mut defs = Self::new();

        // === WEAPONS ===
        defs.add(ItemDefinition::projectile_weapon(
            "rifle.ak",
            "Assault Rifle",
            30,
            3,
        ));
        defs.add(ItemDefinition::projectile_weapon(
            "pistol.semiauto",
            "Semi-Automatic Pistol",
            10,
            2,
        ));

        // === AMMO ===
        defs.add(ItemDefinition::ammo("ammo.rifle", "5.56 Rifle Ammo", 128));
        defs.add(ItemDefinition::ammo(
            "ammo.rifle.hv",
            "HV 5.56 Rifle Ammo",
            128,
        ));
        defs.add(ItemDefinition::ammo("ammo.pistol", "Pistol Bullet", 128));

        // === ATTACHMENTS ===
        defs.add(ItemDefinition::attachment(
            "weapon.mod.lasersight",
            "Weapon Lasersight",
            0,
        ));
        defs.add(ItemDefinition::attachment(
            "weapon.mod.extendedmags",
            "Extended Magazine",
            8,
        ));
        defs.add(ItemDefinition::attachment(
            "weapon.mod.silencer",
            "Silencer",
            0,
        ));

        defs
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Host-world модель: entities, контейнеры, турель
//!
//! Узкие интерфейсы host-симуляции: prefab-спавн, item/container
//! операции, turret control surface.
//! Всё, что здесь лежит, пайплайн экипировки потребляет как данность.

pub mod container;
pub mod supply_drop;
pub mod turret;

// Re-export основных типов
pub use container::{move_to_container, ItemContainer, InContainer};
pub use supply_drop::{spawn_supply_drop, NightLightCheck, SupplyDrop, SupplyDropSpawned};
pub use turret::{
    ensure_reloaded, find_child_turret, initiate_startup, spawn_prefab, update_attached_weapon,
    update_total_ammo, AutoTurret, ColliderShape, DestroyOnGroundMissing, GroundWatch, IoPorts,
    IoSlotType, Magazine, PREFAB_AUTO_TURRET, TURRET_INVENTORY_CAPACITY, TURRET_LOCAL_POSITION,
    WEAPON_SLOT,
};

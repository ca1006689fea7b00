//! Слотовый inventory container (fixed capacity)
//!
//! # Semantics
//!
//! `move_to_container` повторяет поведение host-инвентаря:
//! - пустой слот → item занимает слот (landed)
//! - слот занят стаком того же типа → merge в occupant (item НЕ landed)
//! - слот занят чужим типом / вне диапазона → отказ, ничего не трогаем
//!
//! Caller различает "landed" и "merged" по возвращаемому bool — дистрибутор
//! ammo использует это для force-correct ветки (см. `deploy::ammo`).

use bevy::prelude::*;

use crate::item_system::{ItemDefinitions, ItemStack};

/// Fixed-slot inventory container
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ItemContainer {
    /// Слоты: `None` = пусто, `Some(entity)` = item occupant
    pub slots: Vec<Option<Entity>>,
}

impl ItemContainer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupant слота (None если пусто или слот вне диапазона)
    pub fn slot(&self, index: usize) -> Option<Entity> {
        self.slots.get(index).copied().flatten()
    }

    /// Количество занятых слотов
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Слотовое владение: на каком контейнере и в каком слоте лежит item
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct InContainer {
    pub container: Entity,
    pub slot: usize,
}

/// Переместить item в конкретный слот контейнера
///
/// Возвращает `true` только если item сам занял запрошенный слот.
/// Merge в существующий стак возвращает `false` (amount occupant'а
/// при этом изменился — change detection это "mark dirty").
pub fn move_to_container(
    world: &mut World,
    item: Entity,
    container_entity: Entity,
    slot: usize,
) -> bool {
    let Some(container) = world.get::<ItemContainer>(container_entity) else {
        return false;
    };
    if slot >= container.capacity() {
        return false;
    }

    match container.slot(slot) {
        None => {
            // Пустой слот — item занимает его
            if let Some(mut container) = world.get_mut::<ItemContainer>(container_entity) {
                container.slots[slot] = Some(item);
            }
            world.entity_mut(item).insert((
                InContainer {
                    container: container_entity,
                    slot,
                },
                ChildOf(container_entity),
            ));
            true
        }
        Some(occupant) => {
            let (Some(occupant_stack), Some(item_stack)) = (
                world.get::<ItemStack>(occupant),
                world.get::<ItemStack>(item),
            ) else {
                return false;
            };
            if occupant_stack.def != item_stack.def {
                return false;
            }

            // Merge: доливаем в occupant до max_stack, item слот не получает
            let max_stack = world
                .resource::<ItemDefinitions>()
                .max_stack(&item_stack.def);
            let incoming = item_stack.amount;
            if let Some(mut occupant_stack) = world.get_mut::<ItemStack>(occupant) {
                occupant_stack.amount = (occupant_stack.amount + incoming).min(max_stack);
            }
            false
        }
    }
}

/// Освободить слот, которым владеет item (если владеет)
///
/// Вызывается перед despawn — контейнер не должен держать stale entity.
pub fn detach_from_container(world: &mut World, item: Entity) {
    let Some(owned) = world.get::<InContainer>(item).copied() else {
        return;
    };
    if let Some(mut container) = world.get_mut::<ItemContainer>(owned.container) {
        if container.slot(owned.slot) == Some(item) {
            container.slots[owned.slot] = None;
        }
    }
    world.entity_mut(item).remove::<InContainer>();
}

// ============================================================================
// Tests
// ============================================================================

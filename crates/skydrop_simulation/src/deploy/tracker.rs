//! Lifecycle tracker — учёт заспавненных турелей + bulk teardown
//!
//! Registry хранит opaque `Entity` handles: host может удалить турель
//! out-of-band (despawn supply drop'а забирает ребёнка), поэтому teardown
//! перепроверяет существование и трактует stale handle как успех.

use bevy::prelude::*;

use crate::logger::log_info;

/// Host event: симуляция останавливается, пора убрать все турели
#[derive(Event, Debug, Clone, Copy)]
pub struct ShutdownRequested;

/// Registry турелей, созданных этим ядром (append-only в течение сессии)
#[derive(Resource, Debug, Default)]
pub struct TurretRegistry {
    turrets: Vec<Entity>,
}

impl TurretRegistry {
    /// Зарегистрировать успешно заспавненную турель
    pub fn register(&mut self, turret: Entity) {
        self.turrets.push(turret);
    }

    pub fn len(&self) -> usize {
        self.turrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turrets.is_empty()
    }

    pub fn contains(&self, turret: Entity) -> bool {
        self.turrets.contains(&turret)
    }
}

/// Force-destroy всех турелей из registry и опустошить его
///
/// Уже уничтоженная host'ом турель — безопасный no-op, не ошибка.
pub fn teardown_all(world: &mut World) {
    let turrets = std::mem::take(&mut world.resource_mut::<TurretRegistry>().turrets);
    let total = turrets.len();
    let mut destroyed = 0;

    for turret in turrets {
        if world.get_entity(turret).is_ok() {
            world.despawn(turret);
            destroyed += 1;
        }
    }

    log_info(&format!(
        "🗑️ Teardown: {} турелей уничтожено ({} уже отсутствовали)",
        destroyed,
        total - destroyed
    ));
}

/// System: слушает shutdown event и запускает teardown
///
/// Exclusive — teardown мутирует мир напрямую.
pub fn handle_shutdown(world: &mut World) {
    let requested = world
        .resource_mut::<Events<ShutdownRequested>>()
        .drain()
        .count()
        > 0;
    if requested {
        teardown_all(world);
    }
}

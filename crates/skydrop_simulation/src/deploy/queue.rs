//! Deferred equip queue — явная single-threaded task queue
//!
//! Экипировка нового supply drop'а откладывается ровно на один
//! simulation tick: внутренняя инициализация контейнера должна успеть
//! отработать. Очередь дренится один раз за тик; дрен стоит в цепочке
//! ПЕРЕД системой-enqueue'ером, поэтому задача, поставленная на тике N,
//! исполняется на тике N+1 — не раньше и не позже.

use bevy::prelude::*;

/// Очередь отложенных на один тик экипировок
#[derive(Resource, Debug, Default)]
pub struct DeferredEquips {
    pending: Vec<Entity>,
}

impl DeferredEquips {
    /// Поставить supply drop в очередь на следующий тик
    pub fn enqueue(&mut self, supply_drop: Entity) {
        self.pending.push(supply_drop);
    }

    /// Забрать всё накопленное (очередь пустеет)
    pub fn drain(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//! Turret equipping configuration
//!
//! # Архитектура
//!
//! `TurretConfig` — read-only resource, создаётся на старте и инжектится
//! в системы (explicit context, никаких static'ов). Загрузка/миграция
//! конфига — ответственность host-приложения, сюда приходит уже
//! валидный объект.
//!
//! `AmmoSpec.amount` остаётся знаковым: amount <= 0 означает "skip",
//! а не ошибку валидации.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Ammo spec: shortname + запрошенное количество
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AmmoSpec {
    pub shortname: String,
    pub amount: i32,
}

impl AmmoSpec {
    pub fn new(shortname: impl Into<String>, amount: i32) -> Self {
        Self {
            shortname: shortname.into(),
            amount,
        }
    }
}

/// Конфигурация экипировки турели (immutable на время одной equip-операции)
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct TurretConfig {
    /// Weapon shortname (слот 0 инвентаря турели)
    pub weapon_shortname: String,

    /// Ammo, заряжаемое напрямую в магазин
    pub clip_ammo: Option<AmmoSpec>,

    /// Резервные стаки (слоты 1..N-1, порядок важен)
    pub reserve_ammo: Vec<AmmoSpec>,

    /// Attachments для weapon contents (порядок важен)
    pub attachment_shortnames: Vec<String>,

    /// Peacekeeper targeting mode (стреляет только по агрессивным игрокам)
    pub peacekeeper: bool,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            weapon_shortname: "rifle.ak".to_string(),
            clip_ammo: Some(AmmoSpec::new("ammo.rifle", 30)),
            reserve_ammo: vec![
                AmmoSpec::new("ammo.rifle", 128),
                AmmoSpec::new("ammo.rifle", 128),
            ],
            attachment_shortnames: vec!["weapon.mod.lasersight".to_string()],
            peacekeeper: true,
        }
    }
}

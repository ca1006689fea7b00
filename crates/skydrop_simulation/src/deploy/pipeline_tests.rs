//! Tests for the deploy pipeline (assembler, distributor, orchestrator).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::{AmmoSpec, TurretConfig};
    use crate::deploy::ammo::load_reserve_ammo;
    use crate::deploy::assembler::add_weapon_to_turret;
    use crate::deploy::systems::deploy_auto_turret;
    use crate::deploy::tracker::{teardown_all, ShutdownRequested, TurretRegistry};
    use crate::item_system::{
        create_item_from_def, ItemContents, ItemDefinition, ItemDefinitions, ItemStack,
    };
    use crate::world::container::{move_to_container, ItemContainer};
    use crate::world::supply_drop::{spawn_supply_drop, NightLightCheck, SupplyDrop};
    use crate::world::turret::{find_child_turret, AutoTurret, Magazine, WEAPON_SLOT};
    use crate::{create_headless_app, SupplyDropSpawned};

    fn pipeline_world(config: TurretConfig) -> World {
        let mut world = World::new();
        world.insert_resource(ItemDefinitions::default());
        world.insert_resource(config);
        world.init_resource::<TurretRegistry>();
        world.init_resource::<Events<SupplyDropSpawned>>();
        world
    }

    /// Турель с кастомной ёмкостью инвентаря (мимо prefab'а)
    fn bare_turret(world: &mut World, capacity: usize) -> Entity {
        world
            .spawn((AutoTurret::default(), ItemContainer::new(capacity)))
            .id()
    }

    fn reserve_config(specs: Vec<AmmoSpec>) -> TurretConfig {
        TurretConfig {
            reserve_ammo: specs,
            ..TurretConfig::default()
        }
    }

    fn slot_amount(world: &World, turret: Entity, slot: usize) -> Option<u32> {
        let container = world.get::<ItemContainer>(turret)?;
        let item = container.slot(slot)?;
        world.get::<ItemStack>(item).map(|stack| stack.amount)
    }

    // ========================================================================
    // Ammo distributor
    // ========================================================================

    #[test]
    fn test_two_full_stacks_into_capacity_eight() {
        let mut world = pipeline_world(reserve_config(vec![
            AmmoSpec::new("ammo.rifle", 128),
            AmmoSpec::new("ammo.rifle", 128),
        ]));
        let turret = bare_turret(&mut world, 8);

        load_reserve_ammo(&mut world, turret);

        assert_eq!(slot_amount(&world, turret, 1), Some(128));
        assert_eq!(slot_amount(&world, turret, 2), Some(128));
        for slot in 3..8 {
            assert_eq!(slot_amount(&world, turret, slot), None);
        }
        // Слот 0 остался за weapon'ом
        assert_eq!(slot_amount(&world, turret, WEAPON_SLOT), None);
    }

    #[test]
    fn test_nonpositive_amount_consumes_no_slot() {
        let mut world = pipeline_world(reserve_config(vec![
            AmmoSpec::new("ammo.rifle", 0),
            AmmoSpec::new("ammo.rifle", -5),
            AmmoSpec::new("ammo.rifle", 40),
        ]));
        let turret = bare_turret(&mut world, 8);

        load_reserve_ammo(&mut world, turret);

        // Skip'нутые specs не сдвинули slot index
        assert_eq!(slot_amount(&world, turret, 1), Some(40));
        assert_eq!(slot_amount(&world, turret, 2), None);
        assert_eq!(
            world.get::<ItemContainer>(turret).unwrap().occupied_count(),
            1
        );
    }

    #[test]
    fn test_unknown_shortname_consumes_no_slot() {
        // maxStack(ammoA) = 64 — кастомный item set
        let mut defs = ItemDefinitions::new();
        defs.add(ItemDefinition::ammo("ammo.test", "Test Ammo", 64));

        let mut world = pipeline_world(reserve_config(vec![
            AmmoSpec::new("ammo.unknown", 50),
            AmmoSpec::new("ammo.test", 40),
        ]));
        world.insert_resource(defs);
        let turret = bare_turret(&mut world, 8);

        load_reserve_ammo(&mut world, turret);

        // Unknown spec слот не съел
        assert_eq!(slot_amount(&world, turret, 1), Some(40));
        assert_eq!(slot_amount(&world, turret, 2), None);
    }

    #[test]
    fn test_stack_clamped_to_max_stack() {
        let mut world = pipeline_world(reserve_config(vec![AmmoSpec::new("ammo.rifle", 500)]));
        let turret = bare_turret(&mut world, 8);

        load_reserve_ammo(&mut world, turret);

        // min(500, 128)
        assert_eq!(slot_amount(&world, turret, 1), Some(128));
    }

    #[test]
    fn test_distribution_halts_past_last_slot() {
        let mut world = pipeline_world(reserve_config(vec![
            AmmoSpec::new("ammo.rifle", 10),
            AmmoSpec::new("ammo.rifle", 20),
            AmmoSpec::new("ammo.rifle", 30),
            AmmoSpec::new("ammo.rifle", 40),
        ]));
        // capacity 3: слоты 1 и 2 — последние допустимые
        let turret = bare_turret(&mut world, 3);

        load_reserve_ammo(&mut world, turret);

        assert_eq!(slot_amount(&world, turret, 1), Some(10));
        assert_eq!(slot_amount(&world, turret, 2), Some(20));
        // Хвост отброшен, не "дораздан" куда-то ещё
        assert_eq!(
            world.get::<ItemContainer>(turret).unwrap().occupied_count(),
            2
        );
    }

    #[test]
    fn test_merge_fallback_corrects_occupant() {
        let mut world = pipeline_world(reserve_config(vec![AmmoSpec::new("ammo.rifle", 40)]));
        let turret = bare_turret(&mut world, 8);

        // Слот 1 уже занят стаком того же типа
        let def = world
            .resource::<ItemDefinitions>()
            .get(&"ammo.rifle".into())
            .unwrap()
            .clone();
        let occupant = create_item_from_def(&mut world, &def, 10);
        assert!(move_to_container(&mut world, occupant, turret, 1));

        load_reserve_ammo(&mut world, turret);

        // Occupant форсирован к расчётному amount, свежий item освобождён
        assert_eq!(world.get::<ItemContainer>(turret).unwrap().slot(1), Some(occupant));
        assert_eq!(world.get::<ItemStack>(occupant).unwrap().amount, 40);

        let stacks = world.query::<&ItemStack>().iter(&world).count();
        assert_eq!(stacks, 1, "дубликат ammo после merge-коррекции");
    }

    // ========================================================================
    // Weapon assembler
    // ========================================================================

    #[test]
    fn test_clip_amount_clamped_to_capacity() {
        // Scenario: clip {ammo, 500}, capacity 30 → loaded 30
        let config = TurretConfig {
            clip_ammo: Some(AmmoSpec::new("ammo.rifle", 500)),
            attachment_shortnames: vec![],
            ..TurretConfig::default()
        };
        let mut world = pipeline_world(config);
        let turret = bare_turret(&mut world, 8);

        let weapon = add_weapon_to_turret(&mut world, turret).expect("weapon assembled");

        let magazine = world.get::<Magazine>(weapon).unwrap();
        assert_eq!(magazine.capacity, 30);
        assert_eq!(magazine.contents, 30);
        assert_eq!(magazine.ammo_type, Some("ammo.rifle".into()));
    }

    #[test]
    fn test_unknown_clip_ammo_skipped() {
        let config = TurretConfig {
            clip_ammo: Some(AmmoSpec::new("ammo.unknown", 30)),
            ..TurretConfig::default()
        };
        let mut world = pipeline_world(config);
        let turret = bare_turret(&mut world, 8);

        let weapon = add_weapon_to_turret(&mut world, turret).expect("weapon assembled");

        // Магазин не заряжен, но остальная сборка прошла
        let magazine = world.get::<Magazine>(weapon).unwrap();
        assert_eq!(magazine.ammo_type, None);
        assert_eq!(magazine.contents, 0);
    }

    #[test]
    fn test_attachment_bonus_applied_before_clip_load() {
        // Extended magazine: 30 + 8 = 38, clip 500 клампится к 38
        let config = TurretConfig {
            clip_ammo: Some(AmmoSpec::new("ammo.rifle", 500)),
            attachment_shortnames: vec!["weapon.mod.extendedmags".to_string()],
            ..TurretConfig::default()
        };
        let mut world = pipeline_world(config);
        let turret = bare_turret(&mut world, 8);

        let weapon = add_weapon_to_turret(&mut world, turret).expect("weapon assembled");

        let magazine = world.get::<Magazine>(weapon).unwrap();
        assert_eq!(magazine.capacity, 38);
        assert_eq!(magazine.contents, 38);
    }

    #[test]
    fn test_failed_attachment_does_not_abort_assembly() {
        // rifle.ak несёт 3 attachment слота: четвёртый и unknown отлетают
        let config = TurretConfig {
            attachment_shortnames: vec![
                "weapon.mod.lasersight".to_string(),
                "weapon.mod.unknown".to_string(),
                "weapon.mod.silencer".to_string(),
                "weapon.mod.extendedmags".to_string(),
                "weapon.mod.lasersight".to_string(),
            ],
            ..TurretConfig::default()
        };
        let mut world = pipeline_world(config);
        let turret = bare_turret(&mut world, 8);

        let weapon = add_weapon_to_turret(&mut world, turret).expect("weapon assembled");

        let contents = world.get::<ItemContents>(weapon).unwrap();
        assert_eq!(contents.items.len(), 3);
        // Переполнивший attachment освобождён, не повис сиротой
        let attachments = world
            .query::<&ItemStack>()
            .iter(&world)
            .filter(|stack| stack.def == "weapon.mod.lasersight".into())
            .count();
        assert_eq!(attachments, 1);
    }

    #[test]
    fn test_weapon_placement_failure_frees_weapon() {
        let mut world = pipeline_world(TurretConfig::default());
        let turret = bare_turret(&mut world, 8);

        // Слот 0 уже занят чужим предметом — move провалится
        let def = world
            .resource::<ItemDefinitions>()
            .get(&"ammo.pistol".into())
            .unwrap()
            .clone();
        let junk = create_item_from_def(&mut world, &def, 1);
        assert!(move_to_container(&mut world, junk, turret, WEAPON_SLOT));

        assert!(add_weapon_to_turret(&mut world, turret).is_none());

        // Weapon освобождён вместе с attachments
        let rifles = world
            .query::<&ItemStack>()
            .iter(&world)
            .filter(|stack| stack.def == "rifle.ak".into())
            .count();
        assert_eq!(rifles, 0);
    }

    // ========================================================================
    // Orchestrator
    // ========================================================================

    #[test]
    fn test_deploy_full_default_loadout() {
        let mut world = pipeline_world(TurretConfig::default());
        let drop = world.spawn(SupplyDrop { lootable: false }).id();

        deploy_auto_turret(&mut world, drop);

        let turret = find_child_turret(&world, drop).expect("turret deployed");
        assert_eq!(slot_amount(&world, turret, 1), Some(128));
        assert_eq!(slot_amount(&world, turret, 2), Some(128));

        let state = world.get::<AutoTurret>(turret).unwrap();
        assert!(state.online);
        assert!(state.peacekeeper);
        assert!(state.attached_weapon.is_some());
        // Магазин 30 + reserve 256
        assert_eq!(state.total_ammo, 286);

        let weapon = state.attached_weapon.unwrap();
        let magazine = world.get::<Magazine>(weapon).unwrap();
        assert_eq!(magazine.contents, 30);
        assert!(magazine.contents <= magazine.capacity);

        assert!(world.resource::<TurretRegistry>().contains(turret));
    }

    #[test]
    fn test_deploy_twice_is_noop() {
        let mut world = pipeline_world(TurretConfig::default());
        let drop = world.spawn(SupplyDrop { lootable: false }).id();

        deploy_auto_turret(&mut world, drop);
        deploy_auto_turret(&mut world, drop);

        let turrets = world
            .query::<&AutoTurret>()
            .iter(&world)
            .count();
        assert_eq!(turrets, 1);
        assert_eq!(world.resource::<TurretRegistry>().len(), 1);
    }

    #[test]
    fn test_deploy_skips_lootable_drop() {
        let mut world = pipeline_world(TurretConfig::default());
        let drop = world.spawn(SupplyDrop { lootable: true }).id();

        deploy_auto_turret(&mut world, drop);

        assert!(find_child_turret(&world, drop).is_none());
        assert!(world.resource::<TurretRegistry>().is_empty());
    }

    #[test]
    fn test_deploy_missing_entity_is_noop() {
        let mut world = pipeline_world(TurretConfig::default());
        let drop = world.spawn(SupplyDrop { lootable: false }).id();
        world.despawn(drop);

        deploy_auto_turret(&mut world, drop);

        assert!(world.resource::<TurretRegistry>().is_empty());
    }

    #[test]
    fn test_teardown_after_external_destroy() {
        let mut world = pipeline_world(TurretConfig::default());
        let first = world.spawn(SupplyDrop { lootable: false }).id();
        let second = world.spawn(SupplyDrop { lootable: false }).id();

        deploy_auto_turret(&mut world, first);
        deploy_auto_turret(&mut world, second);
        assert_eq!(world.resource::<TurretRegistry>().len(), 2);

        let survivor = find_child_turret(&world, second).unwrap();

        // Host удалил первый drop вместе с турелью (out-of-band)
        world.despawn(first);

        teardown_all(&mut world);

        assert!(world.resource::<TurretRegistry>().is_empty());
        assert!(world.get_entity(survivor).is_err());
        let turrets = world.query::<&AutoTurret>().iter(&world).count();
        assert_eq!(turrets, 0);
    }

    // ========================================================================
    // App-level (deferral, startup scan, shutdown)
    // ========================================================================

    #[test]
    fn test_spawned_drop_equipped_one_tick_later() {
        let mut app = create_headless_app();

        let drop = spawn_supply_drop(app.world_mut(), Vec3::ZERO);

        // Тик N: событие прочитано, equip только в очереди
        app.world_mut().run_schedule(FixedUpdate);
        assert!(find_child_turret(app.world(), drop).is_none());

        // Тик N+1: deferred equip исполнился, night light снят
        app.world_mut().run_schedule(FixedUpdate);
        assert!(find_child_turret(app.world(), drop).is_some());
        assert!(app.world().get::<NightLightCheck>(drop).is_none());
    }

    #[test]
    fn test_deferred_equip_on_dead_drop_is_noop() {
        let mut app = create_headless_app();

        let drop = spawn_supply_drop(app.world_mut(), Vec3::ZERO);
        app.world_mut().run_schedule(FixedUpdate);

        // Drop умер между тиками
        app.world_mut().despawn(drop);
        app.world_mut().run_schedule(FixedUpdate);

        assert!(app.world().resource::<TurretRegistry>().is_empty());
    }

    #[test]
    fn test_startup_scan_equips_preexisting_drops() {
        let mut app = create_headless_app();

        // Drop существует до первого тика (без spawn event)
        let drop = app
            .world_mut()
            .spawn(SupplyDrop { lootable: false })
            .id();
        let looted = app
            .world_mut()
            .spawn(SupplyDrop { lootable: true })
            .id();

        app.update();

        assert!(find_child_turret(app.world(), drop).is_some());
        assert!(find_child_turret(app.world(), looted).is_none());
        assert_eq!(app.world().resource::<TurretRegistry>().len(), 1);
    }

    #[test]
    fn test_shutdown_event_triggers_teardown() {
        let mut app = create_headless_app();

        let drop = app
            .world_mut()
            .spawn(SupplyDrop { lootable: false })
            .id();
        app.update();
        let turret = find_child_turret(app.world(), drop).expect("equipped at startup");

        app.world_mut().send_event(ShutdownRequested);
        app.world_mut().run_schedule(FixedUpdate);

        assert!(app.world().get_entity(turret).is_err());
        assert!(app.world().resource::<TurretRegistry>().is_empty());
    }
}

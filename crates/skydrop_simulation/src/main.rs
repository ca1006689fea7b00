//! Headless симуляция SKYDROP
//!
//! Запускает Bevy App без рендера: спавнит несколько supply drops,
//! крутит тики, на выходе — shutdown teardown.

use bevy::prelude::*;
use skydrop_simulation::{
    create_headless_app, spawn_supply_drop, ShutdownRequested, TurretRegistry,
};

fn main() {
    println!("Starting SKYDROP headless simulation");

    let mut app = create_headless_app();

    // Pre-existing drop (подхватится startup-сканом)
    spawn_supply_drop(app.world_mut(), Vec3::new(120.0, 0.0, -40.0));

    app.update();

    // Новые drops по ходу симуляции (equip отложен на один тик)
    spawn_supply_drop(app.world_mut(), Vec3::new(-75.0, 0.0, 210.0));
    spawn_supply_drop(app.world_mut(), Vec3::new(8.0, 0.0, 14.0));

    for tick in 0..600 {
        app.update();

        if tick % 100 == 0 {
            let turrets = app.world().resource::<TurretRegistry>().len();
            println!("Tick {}: {} turrets deployed", tick, turrets);
        }
    }

    // Shutdown: bulk teardown всех турелей
    app.world_mut().send_event(ShutdownRequested);
    app.world_mut().run_schedule(FixedUpdate);

    let turrets = app.world().resource::<TurretRegistry>().len();
    println!("Simulation complete! Registry: {} turrets", turrets);
}

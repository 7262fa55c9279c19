use wasm_bindgen::prelude::*;
use orrery_engine::*;

pub mod bodies;
pub mod error;
pub mod game;
pub mod orbit;
pub mod starfield;
pub mod state;
pub mod system;
pub mod tracker;
use game::SolarSystem;

orrery_web::export_game!(SolarSystem, "solar-system");

// ── UI mutators ──────────────────────────────────────────────────────

/// Select a planet by name, or clear with `undefined`. Returns false if rejected.
#[wasm_bindgen]
pub fn select_body(name: Option<String>) -> bool {
    with_runner(|r| match r.game_mut().select_body(name.as_deref()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("select_body: {e}");
            false
        }
    })
}

#[wasm_bindgen]
pub fn set_time_speed(speed: f64) -> bool {
    with_runner(|r| match r.game_mut().set_time_speed(speed) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("set_time_speed: {e}");
            false
        }
    })
}

#[wasm_bindgen]
pub fn set_show_orbits(show: bool) {
    with_runner(|r| r.game_mut().set_show_orbits(show));
}

#[wasm_bindgen]
pub fn get_selected_body_json() -> String {
    with_runner(|r| r.game().selected_body_json())
}

#[wasm_bindgen]
pub fn get_simulation_state_json() -> String {
    with_runner(|r| r.game().state().to_json())
}

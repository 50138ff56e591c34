#![cfg(target_arch = "wasm32")]

use sprite_stepper::headless::HeadlessHost;
use sprite_stepper::host::SceneHost;
use sprite_stepper::scene::{NodeId, SceneId, Target};
use sprite_stepper::tween::{Timeline, Tween};
use sprite_stepper::web::WebScheduler;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn timeline_plays_against_the_real_clock() {
    use sprite_stepper::host::TweenScheduler;

    let scheduler = WebScheduler;
    let x = Target::X(NodeId::from_raw(1));
    let timeline = Timeline::new().then(Tween::new(x, 0.0, 10.0, 0.1));

    let started = js_sys::Date::now();
    let mut last = None;
    scheduler
        .play(&timeline, &mut |_, value| last = Some(value))
        .await
        .expect("play");

    assert_eq!(last, Some(10.0));
    assert!(js_sys::Date::now() - started >= 90.0);
}

#[wasm_bindgen_test]
async fn delay_waits_on_a_timer() {
    use sprite_stepper::host::TweenScheduler;

    let scheduler = WebScheduler;
    let started = js_sys::Date::now();
    scheduler.delay(0.05).await.expect("delay");
    assert!(js_sys::Date::now() - started >= 40.0);
}

#[wasm_bindgen_test]
fn headless_host_runs_in_the_browser_too() {
    let host = HeadlessHost::new();
    host.attach().expect("attach");
    host.set_property(Target::SceneAlpha(SceneId::Game), 0.5);
    assert_eq!(host.property(Target::SceneAlpha(SceneId::Game)), Some(0.5));
}

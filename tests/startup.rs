use approx::assert_relative_eq;
use futures::executor::block_on;
use sprite_stepper::config::Config;
use sprite_stepper::game::{Game, Outcome};
use sprite_stepper::headless::{HeadlessHost, HeadlessScheduler};
use sprite_stepper::host::SceneHost;
use sprite_stepper::scene::{SceneId, Target, Visual};
use sprite_stepper::sequencer::{Motion, MoveCommand};
use sprite_stepper::tween::Easing;

fn config(step_size: f64) -> Config {
    Config {
        motion: Motion {
            step_duration: 1.0,
            step_delay: 0.5,
            step_size,
            easing: Easing::EaseInOut,
        },
        ..Config::default()
    }
}

fn game(
    host: HeadlessHost,
    tokens: &[&str],
    step_size: f64,
) -> Game<HeadlessHost, HeadlessScheduler> {
    Game::new(
        host,
        HeadlessScheduler::new(),
        config(step_size),
        MoveCommand::parse_all(tokens),
    )
}

fn sprite_tweens(game: &Game<HeadlessHost, HeadlessScheduler>) -> usize {
    game.scheduler()
        .played()
        .iter()
        .flat_map(|played| played.tweens.iter())
        .filter(|tween| matches!(tween.target, Target::X(_)))
        .count()
}

#[test]
fn scripted_moves_end_on_signed_sum() {
    let game = game(HeadlessHost::new(), &["L+", "L+", "L-"], 10.0);
    let outcome = block_on(game.initialize()).expect("startup");

    assert_eq!(
        outcome,
        Outcome::Animated {
            final_x: 410.0,
            steps: 3
        }
    );

    let played = game.scheduler().played();
    let moves = played.last().expect("move timeline");
    let targets: Vec<f64> = moves.tweens.iter().map(|tween| tween.to).collect();
    assert_eq!(targets, vec![410.0, 420.0, 410.0]);
    assert_relative_eq!(moves.duration, 3.0 * (1.0 + 0.5));

    let stage = game.host().stage();
    let sprite = &stage.scene(SceneId::Game).children[0];
    assert_relative_eq!(sprite.position.x, 410.0);
    assert_relative_eq!(sprite.position.y, 300.0);
}

#[test]
fn transition_leaves_only_game_scene_visible() {
    let game = game(HeadlessHost::new(), &["R+"], 50.0);
    block_on(game.initialize()).expect("startup");

    let host = game.host();
    let loading = host.property(Target::SceneAlpha(SceneId::Loading)).unwrap_or(1.0);
    let visible = host.property(Target::SceneAlpha(SceneId::Game)).unwrap_or(0.0);
    assert!(loading <= 0.01);
    assert!(visible >= 0.99);
    assert_eq!(host.child_count(SceneId::Loading), 0);
    assert_eq!(host.child_count(SceneId::Game), 1);
}

#[test]
fn transition_overlaps_the_two_fades() {
    let game = game(HeadlessHost::new(), &[], 10.0);
    block_on(game.initialize()).expect("startup");

    let config = game.config();
    let played = game.scheduler().played();
    // fade in, then cross fade; no move timeline for an empty list
    assert_eq!(played.len(), 2);
    let cross_fade = &played[1];
    assert_eq!(cross_fade.tweens.len(), 2);
    assert_relative_eq!(
        cross_fade.duration,
        2.0 * config.transition_duration - config.transition_overlap
    );
}

#[test]
fn empty_commands_complete_at_start_x() {
    let game = game(HeadlessHost::new(), &[], 10.0);
    let outcome = block_on(game.initialize()).expect("startup");

    assert_eq!(
        outcome,
        Outcome::Animated {
            final_x: 400.0,
            steps: 0
        }
    );
    assert_eq!(sprite_tweens(&game), 0);
}

#[test]
fn total_move_time_is_count_times_step_and_gap() {
    let tokens = ["R+", "R-", "L+", "L+", "R-"];
    let game = game(HeadlessHost::new(), &tokens, 10.0);

    block_on(game.initialize()).expect("startup");
    let played = game.scheduler().played();
    let moves = played.last().expect("move timeline");

    assert_relative_eq!(moves.duration, tokens.len() as f64 * 1.5);
    assert_eq!(sprite_tweens(&game), tokens.len());
}

#[test]
fn load_failure_parks_on_error_label() {
    let game = game(HeadlessHost::failing("image decode failed"), &["L+", "L-"], 10.0);
    let outcome = block_on(game.initialize()).expect("startup");

    match outcome {
        Outcome::Failed { reason } => assert!(reason.contains("image decode failed")),
        other => panic!("expected failure, got {:?}", other),
    }

    let stage = game.host().stage();
    let loading = stage.scene(SceneId::Loading);
    assert_relative_eq!(loading.alpha, 1.0);
    assert_eq!(loading.children.len(), 1);
    match &loading.children[0].visual {
        Visual::Text { content, .. } => assert_eq!(content, &game.config().error_text),
        other => panic!("expected error label, got {:?}", other),
    }
    assert!(stage.scene(SceneId::Game).children.is_empty());
    assert_eq!(sprite_tweens(&game), 0);
}

#[test]
fn unknown_sign_counts_as_backwards_move() {
    let game = game(HeadlessHost::new(), &["L+", "L?"], 10.0);
    let outcome = block_on(game.initialize()).expect("startup");

    assert_eq!(
        outcome,
        Outcome::Animated {
            final_x: 400.0,
            steps: 2
        }
    );
}

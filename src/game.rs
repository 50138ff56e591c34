use crate::config::Config;
use crate::host::{SceneHost, TweenScheduler};
use crate::scene::{NodeId, Point, SceneId, Target};
use crate::sequencer::{AnimationChain, MoveCommand};
use crate::tween::{Timeline, Tween};
use anyhow::{anyhow, Result};
use futures::future::{select, Either};
use futures::pin_mut;
use tracing::{debug, error, info, warn};

/// TABLE
/// ┌──────────────────────── Startup Sequence ───────────────────────────┐
/// │                                                                     │
/// │  Booting ──begin()──► Loading ──load()──┬─► Loaded ──reveal()──►    │
/// │  attach canvas        fade in label     │   sprite     cross-fade   │
/// │  scenes alpha 0       progress ramp     │   built      loading→game │
/// │                       ║ asset load      │                           │
/// │                                         └─► Parked (error label)    │
/// │                                                                     │
/// │  Revealed ──animate()──► chained x tweens ──► on_complete(final_x)  │
/// └─────────────────────────────────────────────────────────────────────┘
/// Each phase method consumes the previous phase, so a phase can never be
/// entered twice and the cross-fade has no way back.
pub struct Startup<S> {
    state: S,
}

pub struct Booting;

pub struct Loading {
    readout: NodeId,
}

pub struct Loaded {
    sprite: NodeId,
}

pub struct Revealed {
    sprite: NodeId,
}

pub struct Parked {
    reason: String,
}

pub enum IsLoaded {
    Done(Startup<Loaded>),
    Failed(Startup<Parked>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every move ran; `final_x` is the sprite's resting coordinate
    Animated { final_x: f64, steps: usize },
    /// Asset load failed and the error label is on screen
    Failed { reason: String },
}

/// Root controller : owns the scene host, the tween scheduler, the fixed
/// configuration and the move commands read at startup
pub struct Game<H, S> {
    host: H,
    scheduler: S,
    config: Config,
    commands: Vec<MoveCommand>,
}

impl<H, S> Game<H, S>
where
    H: SceneHost,
    S: TweenScheduler,
{
    pub fn new(host: H, scheduler: S, config: Config, commands: Vec<MoveCommand>) -> Self {
        Game {
            host,
            scheduler,
            config,
            commands,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the whole startup : bootstrap -> loading -> transition -> moves.
    /// An asset failure is not an `Err` : it parks the app on the error label.
    pub async fn initialize(&self) -> Result<Outcome> {
        let booting = Startup::boot(self)?;
        let loading = booting.begin(self).await?;
        let loaded = match loading.load(self).await? {
            IsLoaded::Done(loaded) => loaded,
            IsLoaded::Failed(parked) => {
                return Ok(Outcome::Failed {
                    reason: parked.state.reason,
                })
            }
        };
        let revealed = loaded.reveal(self).await?;

        let chain = self
            .animate(revealed.sprite(), |final_x| {
                info!(final_x, "animation complete");
            })
            .await?;

        Ok(Outcome::Animated {
            final_x: chain.final_x(),
            steps: chain.len(),
        })
    }

    /// Moves `sprite` through the command list, one step at a time, then
    /// reports the final coordinate. An empty list completes at once.
    pub async fn animate<F>(&self, sprite: NodeId, on_complete: F) -> Result<AnimationChain>
    where
        F: FnOnce(f64),
    {
        let start_x = self
            .host
            .property(Target::X(sprite))
            .ok_or_else(|| anyhow!("Sprite {:?} is not on stage", sprite))?;
        let chain = AnimationChain::plan(start_x, &self.commands, self.config.motion);

        if chain.is_empty() {
            debug!("no move commands, skipping animation");
            on_complete(chain.final_x());
            return Ok(chain);
        }

        info!(
            steps = chain.len(),
            start_x,
            duration = chain.duration(),
            "animating sprite"
        );
        for (step, to_x) in chain.targets().iter().enumerate() {
            debug!(step, to_x = *to_x, "queued move");
        }

        self.play(&chain.timeline(sprite)).await?;
        on_complete(chain.final_x());
        Ok(chain)
    }

    async fn play(&self, timeline: &Timeline) -> Result<()> {
        let host = &self.host;
        let mut sink = |target: Target, value: f64| host.set_property(target, value);
        self.scheduler.play(timeline, &mut sink).await
    }

    /// Cosmetic readout climbing to the configured ceiling. It knows nothing
    /// about real progress and is dropped as soon as the load resolves.
    async fn progress_ramp(&self, readout: NodeId) -> Result<()> {
        let mut percent = 0;
        while percent < self.config.progress_ceiling {
            self.scheduler.delay(self.config.progress_interval).await?;
            percent = (percent + self.config.progress_step).min(self.config.progress_ceiling);
            self.host.set_text(readout, &format!("{}%", percent));
        }
        Ok(())
    }

    fn center(&self) -> Point {
        let (x, y) = self.config.center();
        Point { x, y }
    }
}

impl Startup<Booting> {
    /// Attach the canvas and hide both scenes
    pub fn boot<H: SceneHost, S: TweenScheduler>(game: &Game<H, S>) -> Result<Self> {
        game.host.attach()?;
        game.host.set_property(Target::SceneAlpha(SceneId::Loading), 0.0);
        game.host.set_property(Target::SceneAlpha(SceneId::Game), 0.0);
        info!(
            width = game.config.width,
            height = game.config.height,
            "canvas attached"
        );
        Ok(Startup { state: Booting })
    }

    /// Fade the loading scene in, then its labels
    pub async fn begin<H: SceneHost, S: TweenScheduler>(
        self,
        game: &Game<H, S>,
    ) -> Result<Startup<Loading>> {
        let config = &game.config;
        let center = game.center();

        let label = game.host.add_text(
            SceneId::Loading,
            &config.loading_text,
            &config.label_style,
            center,
        );
        let readout = game.host.add_text(
            SceneId::Loading,
            "0%",
            &config.readout_style,
            Point {
                x: center.x,
                y: center.y + f64::from(config.label_style.font_size) * 1.5,
            },
        );
        game.host.set_property(Target::Alpha(label), 0.0);
        game.host.set_property(Target::Alpha(readout), 0.0);

        let fade_in = Timeline::new()
            .then(
                Tween::new(Target::SceneAlpha(SceneId::Loading), 0.0, 1.0, config.scene_fade)
                    .with_easing(config.fade_easing),
            )
            .then(
                Tween::new(Target::Alpha(label), 0.0, 1.0, config.label_fade)
                    .with_easing(config.fade_easing),
            )
            .then_at(
                Tween::new(Target::Alpha(readout), 0.0, 1.0, config.label_fade)
                    .with_easing(config.fade_easing),
                -config.label_fade,
            );

        info!("loading screen up");
        game.play(&fade_in).await?;

        Ok(Startup {
            state: Loading { readout },
        })
    }
}

impl Startup<Loading> {
    /// Fetch the sprite texture while the readout ramps. On success the
    /// readout snaps to 100% and holds briefly; on failure the loading scene
    /// is replaced by the error label for good.
    pub async fn load<H: SceneHost, S: TweenScheduler>(
        self,
        game: &Game<H, S>,
    ) -> Result<IsLoaded> {
        let config = &game.config;
        let readout = self.state.readout;

        info!(bundle = %config.bundle, alias = %config.sprite_alias, "loading assets");
        let ramp = game.progress_ramp(readout);
        let load = game.host.load_texture(&config.bundle, &config.sprite_alias);
        pin_mut!(ramp, load);

        let loaded = match select(ramp, load).await {
            Either::Left((ramp_result, load)) => {
                if let Err(err) = ramp_result {
                    warn!("progress ramp stopped : {:#}", err);
                }
                load.await
            }
            Either::Right((load_result, _ramp)) => load_result,
        };

        match loaded {
            Ok(texture) => {
                game.host.set_text(readout, "100%");
                game.scheduler.delay(config.complete_pause).await?;
                let sprite = game.host.add_sprite(SceneId::Game, texture, game.center(), 0.5);
                info!("assets loaded");
                Ok(IsLoaded::Done(Startup {
                    state: Loaded { sprite },
                }))
            }
            Err(err) => {
                let reason = format!("{:#}", err);
                error!("asset load failed : {}", reason);
                game.host.clear(SceneId::Loading);
                game.host.add_text(
                    SceneId::Loading,
                    &config.error_text,
                    &config.label_style,
                    game.center(),
                );
                game.host.set_property(Target::SceneAlpha(SceneId::Loading), 1.0);
                Ok(IsLoaded::Failed(Startup {
                    state: Parked { reason },
                }))
            }
        }
    }
}

impl Startup<Loaded> {
    /// Cross-fade loading -> game, the game fade starting before the loading
    /// fade ends. The loading scene is emptied afterwards.
    pub async fn reveal<H: SceneHost, S: TweenScheduler>(
        self,
        game: &Game<H, S>,
    ) -> Result<Startup<Revealed>> {
        let config = &game.config;
        let cross_fade = Timeline::new()
            .then(
                Tween::new(
                    Target::SceneAlpha(SceneId::Loading),
                    1.0,
                    0.0,
                    config.transition_duration,
                )
                .with_easing(config.fade_easing),
            )
            .then_at(
                Tween::new(
                    Target::SceneAlpha(SceneId::Game),
                    0.0,
                    1.0,
                    config.transition_duration,
                )
                .with_easing(config.fade_easing),
                -config.transition_overlap,
            );

        info!(duration = cross_fade.duration(), "scene transition");
        game.play(&cross_fade).await?;
        game.host.clear(SceneId::Loading);

        Ok(Startup {
            state: Revealed {
                sprite: self.state.sprite,
            },
        })
    }
}

impl Startup<Revealed> {
    pub fn sprite(&self) -> NodeId {
        self.state.sprite
    }
}

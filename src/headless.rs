//! DOM free scene host and tween scheduler. Time is virtual : delays and
//! timelines advance a clock instead of waiting, and every wait yields once
//! to the executor so concurrent flows still interleave.
use crate::host::{SceneHost, TweenScheduler};
use crate::scene::{NodeId, Point, SceneId, Stage, Target, TextStyle, Visual};
use crate::tween::{Timeline, Tween};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::cell::{Cell, Ref, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

const FRAME: f64 = 1.0 / 60.0;

/// Pending exactly once, waking itself
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    pub bundle: String,
    pub alias: String,
}

pub struct HeadlessHost {
    stage: RefCell<Stage<HeadlessTexture>>,
    attached: Cell<bool>,
    failure: Option<String>,
    latency: usize,
    texts: RefCell<Vec<String>>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        HeadlessHost {
            stage: RefCell::new(Stage::new()),
            attached: Cell::new(false),
            failure: None,
            latency: 0,
            texts: RefCell::new(Vec::new()),
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        HeadlessHost::default()
    }

    /// Every texture load rejects with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        HeadlessHost {
            failure: Some(reason.into()),
            ..HeadlessHost::default()
        }
    }

    /// Number of executor yields a texture load takes to settle
    pub fn with_latency(mut self, yields: usize) -> Self {
        self.latency = yields;
        self
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn stage(&self) -> Ref<'_, Stage<HeadlessTexture>> {
        self.stage.borrow()
    }

    /// Every string written to a text node, oldest first
    pub fn text_history(&self) -> Vec<String> {
        self.texts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SceneHost for HeadlessHost {
    type Texture = HeadlessTexture;

    fn attach(&self) -> Result<()> {
        if self.attached.replace(true) {
            return Err(anyhow!("Stage is already attached"));
        }
        Ok(())
    }

    fn add_text(
        &self,
        scene: SceneId,
        content: &str,
        style: &TextStyle,
        position: Point,
    ) -> NodeId {
        self.texts.borrow_mut().push(content.to_string());
        self.stage.borrow_mut().add(
            scene,
            position,
            Visual::Text {
                content: content.to_string(),
                style: style.clone(),
            },
        )
    }

    fn set_text(&self, node: NodeId, content: &str) {
        if self.stage.borrow_mut().set_text(node, content) {
            self.texts.borrow_mut().push(content.to_string());
        }
    }

    fn add_sprite(
        &self,
        scene: SceneId,
        texture: HeadlessTexture,
        position: Point,
        anchor: f64,
    ) -> NodeId {
        self.stage
            .borrow_mut()
            .add(scene, position, Visual::Sprite { texture, anchor })
    }

    fn set_property(&self, target: Target, value: f64) {
        self.stage.borrow_mut().set(target, value);
    }

    fn property(&self, target: Target) -> Option<f64> {
        self.stage.borrow().get(target)
    }

    fn clear(&self, scene: SceneId) {
        self.stage.borrow_mut().clear(scene);
    }

    fn child_count(&self, scene: SceneId) -> usize {
        self.stage.borrow().scene(scene).children.len()
    }

    async fn load_texture(&self, bundle: &str, alias: &str) -> Result<HeadlessTexture> {
        for _ in 0..self.latency {
            yield_now().await;
        }
        match &self.failure {
            Some(reason) => Err(anyhow!("{}", reason)
                .context(format!("Failed to load '{}' from bundle '{}'", alias, bundle))),
            None => Ok(HeadlessTexture {
                bundle: bundle.to_string(),
                alias: alias.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayedTimeline {
    pub started_at: f64,
    pub duration: f64,
    pub tweens: Vec<Tween>,
}

#[derive(Default)]
pub struct HeadlessScheduler {
    clock: Cell<f64>,
    played: RefCell<Vec<PlayedTimeline>>,
    delays: RefCell<Vec<f64>>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        HeadlessScheduler::default()
    }

    /// Virtual seconds elapsed so far
    pub fn elapsed(&self) -> f64 {
        self.clock.get()
    }

    pub fn played(&self) -> Vec<PlayedTimeline> {
        self.played.borrow().clone()
    }

    pub fn delays(&self) -> Vec<f64> {
        self.delays.borrow().clone()
    }
}

#[async_trait(?Send)]
impl TweenScheduler for HeadlessScheduler {
    async fn delay(&self, seconds: f64) -> Result<()> {
        self.delays.borrow_mut().push(seconds);
        self.clock.set(self.clock.get() + seconds);
        yield_now().await;
        Ok(())
    }

    async fn play(&self, timeline: &Timeline, sink: &mut dyn FnMut(Target, f64)) -> Result<()> {
        let started_at = self.clock.get();
        let duration = timeline.duration();

        let mut elapsed = 0.0;
        loop {
            elapsed = f64::min(elapsed + FRAME, duration);
            for (target, value) in timeline.sample(elapsed) {
                sink(target, value);
            }
            if elapsed >= duration {
                break;
            }
        }

        self.clock.set(started_at + duration);
        self.played.borrow_mut().push(PlayedTimeline {
            started_at,
            duration,
            tweens: timeline.tweens().copied().collect(),
        });
        yield_now().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use futures::executor::block_on;

    #[test]
    fn play_lands_on_final_values_and_advances_clock() {
        let scheduler = HeadlessScheduler::new();
        let x = Target::X(NodeId::from_raw(1));
        let timeline = Timeline::new()
            .then(Tween::new(x, 0.0, 10.0, 0.5))
            .then(Tween::new(x, 10.0, 30.0, 0.5).with_delay(0.25));

        let mut last = None;
        block_on(scheduler.play(&timeline, &mut |_, value| last = Some(value))).expect("play");

        assert_relative_eq!(last.unwrap_or_default(), 30.0);
        assert_relative_eq!(scheduler.elapsed(), 1.25);
        assert_eq!(scheduler.played().len(), 1);
    }

    #[test]
    fn delay_advances_clock() {
        let scheduler = HeadlessScheduler::new();
        block_on(async {
            scheduler.delay(0.5).await?;
            scheduler.delay(0.25).await
        })
        .expect("delay");

        assert_relative_eq!(scheduler.elapsed(), 0.75);
        assert_eq!(scheduler.delays(), vec![0.5, 0.25]);
    }

    #[test]
    fn host_attaches_once() {
        let host = HeadlessHost::new();
        assert!(host.attach().is_ok());
        assert!(host.attach().is_err());
    }

    #[test]
    fn failing_host_rejects_loads() {
        let host = HeadlessHost::failing("404");
        let err = block_on(host.load_texture("game", "sprite")).expect_err("should fail");
        assert!(format!("{:#}", err).contains("404"));
    }
}

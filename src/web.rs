use crate::browser;
use crate::config::Config;
use crate::engine::{AssetLoader, Renderer, Ticker};
use crate::host::{SceneHost, TweenScheduler};
use crate::scene::{NodeId, Point, SceneId, Stage, Target, TextStyle, Visual};
use crate::tween::Timeline;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use web_sys::HtmlImageElement;

/// Canvas backed scene host. The stage is shared with the ticker, which
/// redraws it every animation frame once attached.
pub struct WebHost {
    width: u32,
    height: u32,
    background: u32,
    stage: Rc<RefCell<Stage<HtmlImageElement>>>,
    loader: AssetLoader,
}

impl WebHost {
    pub fn new(config: &Config) -> Self {
        WebHost {
            width: config.width,
            height: config.height,
            background: config.background,
            stage: Rc::new(RefCell::new(Stage::new())),
            loader: AssetLoader::new(config.manifest_url.clone()),
        }
    }
}

#[async_trait(?Send)]
impl SceneHost for WebHost {
    type Texture = HtmlImageElement;

    fn attach(&self) -> Result<()> {
        let resolution = browser::device_pixel_ratio()?;
        let canvas = browser::attach_canvas(self.width, self.height, resolution)?;
        let renderer = Renderer::new(
            browser::context(&canvas)?,
            self.width,
            self.height,
            resolution,
            self.background,
        )?;
        debug!(resolution, "starting ticker");
        Ticker::start(renderer, self.stage.clone())
    }

    fn add_text(
        &self,
        scene: SceneId,
        content: &str,
        style: &TextStyle,
        position: Point,
    ) -> NodeId {
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
        self.stage.borrow_mut().set_text(node, content);
    }

    fn add_sprite(
        &self,
        scene: SceneId,
        texture: HtmlImageElement,
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

    async fn load_texture(&self, bundle: &str, alias: &str) -> Result<HtmlImageElement> {
        // fail on a bad alias before downloading the rest of the bundle
        let src = self.loader.init().await?.resolve(bundle, alias)?.to_string();
        debug!(alias, src = %src, "resolved texture");
        let mut textures = self.loader.load_bundle(bundle).await?;
        textures
            .remove(alias)
            .ok_or_else(|| anyhow!("Bundle '{}' has no asset '{}'", bundle, alias))
    }
}

/// Timer and animation frame backed tween scheduler
pub struct WebScheduler;

#[async_trait(?Send)]
impl TweenScheduler for WebScheduler {
    async fn delay(&self, seconds: f64) -> Result<()> {
        browser::sleep((seconds * 1000.0).round() as i32).await
    }

    async fn play(&self, timeline: &Timeline, sink: &mut dyn FnMut(Target, f64)) -> Result<()> {
        if timeline.is_empty() {
            return Ok(());
        }
        let duration = timeline.duration();
        let start = browser::now()?;
        loop {
            let timestamp = browser::next_frame().await?;
            let elapsed = ((timestamp - start) / 1000.0).clamp(0.0, duration);
            for (target, value) in timeline.sample(elapsed) {
                sink(target, value);
            }
            if elapsed >= duration {
                return Ok(());
            }
        }
    }
}

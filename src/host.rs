use crate::scene::{NodeId, Point, SceneId, Target, TextStyle};
use crate::tween::Timeline;
use anyhow::Result;
use async_trait::async_trait;

/// Everything the startup sequence needs from a renderer : a display tree
/// with two scenes and an asset loader. Methods take `&self` because the
/// tween sink writes through the host while a timeline is playing.
#[async_trait(?Send)]
pub trait SceneHost {
    type Texture;

    /// Put the drawing surface on the page and start redrawing
    fn attach(&self) -> Result<()>;

    fn add_text(
        &self,
        scene: SceneId,
        content: &str,
        style: &TextStyle,
        position: Point,
    ) -> NodeId;

    fn set_text(&self, node: NodeId, content: &str);

    fn add_sprite(
        &self,
        scene: SceneId,
        texture: Self::Texture,
        position: Point,
        anchor: f64,
    ) -> NodeId;

    fn set_property(&self, target: Target, value: f64);

    fn property(&self, target: Target) -> Option<f64>;

    /// Discard every child of a scene
    fn clear(&self, scene: SceneId);

    fn child_count(&self, scene: SceneId) -> usize;

    async fn load_texture(&self, bundle: &str, alias: &str) -> Result<Self::Texture>;
}

/// Drives timelines and timed pauses
#[async_trait(?Send)]
pub trait TweenScheduler {
    async fn delay(&self, seconds: f64) -> Result<()>;

    /// Resolves once the whole timeline has elapsed. Every sampled value is
    /// pushed into `sink`, the final values included.
    async fn play(&self, timeline: &Timeline, sink: &mut dyn FnMut(Target, f64)) -> Result<()>;
}

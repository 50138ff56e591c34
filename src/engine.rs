use crate::browser;
use crate::scene::{Point, Stage, TextStyle, Visual};
use anyhow::{anyhow, Context, Error, Result};
// web assembly is single threaded, so Rc RefCell > Mutex
use futures::channel::oneshot::channel;
use futures::future::try_join_all;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::{
    // unchecked_ref casts a js closure to a js Function; we create the
    // closure ourselves so the expected type is known
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Box of a `width` x `height` image drawn at `position`, shifted by the
    /// anchor fraction so 0.5 centers it on the position
    pub fn anchored(position: Point, anchor: f64, width: f64, height: f64) -> Self {
        Rect {
            x: position.x - width * anchor,
            y: position.y - height * anchor,
            width,
            height,
        }
    }
}

/// `0x1099bb` -> `"#1099bb"`
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

/// `TextStyle` -> canvas font shorthand
pub fn css_font(style: &TextStyle) -> String {
    format!("{}px {}", style.font_size, style.font_family)
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    background: String,
}

impl Renderer {
    /// Scales the context by `resolution` so drawing stays in css pixels
    pub fn new(
        context: CanvasRenderingContext2d,
        width: u32,
        height: u32,
        resolution: f64,
        background: u32,
    ) -> Result<Self> {
        context
            .scale(resolution, resolution)
            .map_err(|err| anyhow!("Could not scale context : {:#?}", err))?;
        context.set_text_align("center");
        context.set_text_baseline("middle");
        Ok(Renderer {
            context,
            width: f64::from(width),
            height: f64::from(height),
            background: css_color(background),
        })
    }

    pub fn clear(&self) {
        self.context.set_global_alpha(1.0);
        self.context.set_fill_style_str(&self.background);
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
    }

    pub fn draw_image(
        &self,
        image: &HtmlImageElement,
        destination: &Rect,
        alpha: f64,
    ) -> Result<()> {
        self.context.set_global_alpha(alpha);
        self.context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                destination.x,
                destination.y,
                destination.width,
                destination.height,
            )
            .map_err(|err| anyhow!("Could not draw image : {:#?}", err))
    }

    pub fn draw_text(
        &self,
        content: &str,
        style: &TextStyle,
        position: Point,
        alpha: f64,
    ) -> Result<()> {
        self.context.set_global_alpha(alpha);
        self.context.set_font(&css_font(style));
        self.context.set_fill_style_str(&css_color(style.fill));
        self.context
            .fill_text(content, position.x, position.y)
            .map_err(|err| anyhow!("Could not draw text : {:#?}", err))
    }

    /// Draw order matters : loading scene -> game scene, children in order.
    /// Scene alpha multiplies into each child's alpha.
    pub fn draw_stage(&self, stage: &Stage<HtmlImageElement>) -> Result<()> {
        self.clear();
        for scene in stage.scenes() {
            if scene.alpha <= 0.0 {
                continue;
            }
            for node in &scene.children {
                let alpha = scene.alpha * node.alpha;
                if alpha <= 0.0 {
                    continue;
                }
                match &node.visual {
                    Visual::Sprite { texture, anchor } => {
                        let destination = Rect::anchored(
                            node.position,
                            *anchor,
                            f64::from(texture.natural_width()),
                            f64::from(texture.natural_height()),
                        );
                        self.draw_image(texture, &destination, alpha)?;
                    }
                    Visual::Text { content, style } => {
                        self.draw_text(content, style, node.position, alpha)?;
                    }
                }
            }
        }
        Ok(())
    }
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

/// Per frame redraw of a shared stage, the renderer's ticker. Tweens write
/// into the stage from async tasks; the ticker only reads it.
pub struct Ticker;

impl Ticker {
    pub fn start(renderer: Renderer, stage: Rc<RefCell<Stage<HtmlImageElement>>>) -> Result<()> {
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        let mut reported = false;
        *g.borrow_mut() = Some(browser::create_raf_closure(move |_perf: f64| {
            if let Err(err) = renderer.draw_stage(&stage.borrow()) {
                // report once, a broken draw repeats every frame
                if !reported {
                    warn!("draw failed : {:#}", err);
                    reported = true;
                }
            }
            if let Some(next) = f.borrow().as_ref() {
                let _ = browser::request_animation_frame(next);
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("Ticker: Loop is None"))?,
        )?;

        Ok(())
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!("Error loading image : {:#?}", err)));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - outer : channel result
    // - inner : image load result
    let loaded = rx.await.context("Image callbacks dropped");
    image.set_onload(None);
    image.set_onerror(None);
    drop(success_callback);
    drop(error_callback);
    loaded??;

    Ok(image)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetEntry {
    pub alias: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub assets: Vec<AssetEntry>,
}

/// Named groups of assets, fetched once as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetManifest {
    pub bundles: Vec<Bundle>,
}

impl AssetManifest {
    pub fn bundle(&self, name: &str) -> Result<&Bundle> {
        self.bundles
            .iter()
            .find(|bundle| bundle.name == name)
            .ok_or_else(|| anyhow!("No bundle named '{}' in manifest", name))
    }

    pub fn resolve(&self, bundle: &str, alias: &str) -> Result<&str> {
        self.bundle(bundle)?
            .assets
            .iter()
            .find(|asset| asset.alias == alias)
            .map(|asset| asset.src.as_str())
            .ok_or_else(|| anyhow!("No asset '{}' in bundle '{}'", alias, bundle))
    }
}

pub struct AssetLoader {
    manifest_url: String,
    manifest: RefCell<Option<Rc<AssetManifest>>>,
}

impl AssetLoader {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        AssetLoader {
            manifest_url: manifest_url.into(),
            manifest: RefCell::new(None),
        }
    }

    /// Fetch the manifest on first use, afterwards hand back the cached copy
    pub async fn init(&self) -> Result<Rc<AssetManifest>> {
        let cached = self.manifest.borrow().clone();
        if let Some(manifest) = cached {
            return Ok(manifest);
        }
        let manifest: AssetManifest = browser::fetch_json(&self.manifest_url)
            .await
            .with_context(|| {
                format!("Failed to load asset manifest from : {}", self.manifest_url)
            })?;
        let manifest = Rc::new(manifest);
        *self.manifest.borrow_mut() = Some(manifest.clone());
        Ok(manifest)
    }

    /// Load every image of a bundle in parallel, keyed by alias
    pub async fn load_bundle(&self, name: &str) -> Result<HashMap<String, HtmlImageElement>> {
        let manifest = self.init().await?;
        let bundle = manifest.bundle(name)?;
        debug!(bundle = name, assets = bundle.assets.len(), "loading bundle");

        let images = try_join_all(bundle.assets.iter().map(|asset| async move {
            load_image(&asset.src)
                .await
                .with_context(|| format!("Failed to load image resource from : {}", asset.src))
                .map(|image| (asset.alias.clone(), image))
        }))
        .await?;

        Ok(images.into_iter().collect())
    }
}

use anyhow::{anyhow, Context, Result};
use futures::channel::oneshot::channel;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::Level;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[rustfmt::skip]
use web_sys::{
    Document,
    Window,
    CanvasRenderingContext2d,
    HtmlCanvasElement,
    HtmlElement,
    HtmlImageElement,
    Response,
};

// ==================== Constants ====================
// Constants related to HTML elements
mod html {
    pub const CANVAS: &str = "canvas";
    pub const CONTEXT_2D: &str = "2d";
}

pub type LoopClosure = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn body() -> Result<HtmlElement> {
    document()?
        .body()
        .ok_or_else(|| anyhow!("No Body Found"))
}

pub fn device_pixel_ratio() -> Result<f64> {
    Ok(window()?.device_pixel_ratio())
}

/// Create a canvas whose backing store is `resolution` times its css size,
/// and append it to the page body
pub fn attach_canvas(width: u32, height: u32, resolution: f64) -> Result<HtmlCanvasElement> {
    let canvas = document()?
        .create_element(html::CANVAS)
        .map_err(|err| anyhow!("Could not create canvas element : {:#?}", err))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))?;

    canvas.set_width((f64::from(width) * resolution).round() as u32);
    canvas.set_height((f64::from(height) * resolution).round() as u32);
    let style = canvas.style();
    style
        .set_property("width", &format!("{}px", width))
        .and_then(|_| style.set_property("height", &format!("{}px", height)))
        .map_err(|err| anyhow!("Could not size canvas : {:#?}", err))?;

    body()?
        .append_child(&canvas)
        .map_err(|err| anyhow!("Could not attach canvas : {:#?}", err))?;

    Ok(canvas)
}

pub fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context(html::CONTEXT_2D)
        // Result<Option<Object>, JsValue> : map the JsValue error, then the
        // missing context, then the cast
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn new_image() -> Result<HtmlImageElement> {
    HtmlImageElement::new().map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

pub fn closure_once<F, A, R>(f: F) -> Closure<F::FnMut>
where
    F: 'static + WasmClosureFnOnce<A, R>,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    closure_wrap(Box::new(f))
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

/// Resolves with the timestamp of the next animation frame
pub async fn next_frame() -> Result<f64> {
    let (tx, rx) = channel::<f64>();
    let callback: Closure<dyn FnMut(f64)> = closure_once(move |timestamp: f64| {
        let _ = tx.send(timestamp);
    });
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))?;

    // callback must outlive the frame, so it is held across the await
    let timestamp = rx.await.context("Animation frame callback dropped")?;
    drop(callback);
    Ok(timestamp)
}

/// Resolves after `millis` milliseconds
pub async fn sleep(millis: i32) -> Result<()> {
    let (tx, rx) = channel::<()>();
    let callback: Closure<dyn FnMut()> = closure_once(move || {
        let _ = tx.send(());
    });
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        )
        .map_err(|err| anyhow!("Cannot set timeout : {:#?}", err))?;

    rx.await.context("Timeout callback dropped")?;
    drop(callback);
    Ok(())
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub async fn fetch_json<T>(json_path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp_value = fetch_with_str(json_path).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|element| anyhow!("error converting [{:#?}] to Response", element))?;
    if !resp.ok() {
        return Err(anyhow!(
            "fetching [{}] returned status {}",
            json_path,
            resp.status()
        ));
    }
    let json = resp
        .json()
        .map_err(|err| anyhow!("Could not get JSON from response [{:#?}]", err))?;

    let json_value = JsFuture::from(json)
        .await
        .map_err(|err| anyhow!("error fetching [{:#?}]", err))?;

    serde_wasm_bindgen::from_value(json_value)
        .map_err(|err| anyhow!("error converting response : {:#?}", err))
}

async fn fetch_with_str(resource: &str) -> Result<JsValue> {
    let resp = window()?.fetch_with_str(resource);

    JsFuture::from(resp)
        .await
        .map_err(|err| anyhow!("error fetching : {:#?}", err))
}

// ==================== Logging ====================
/// Route `tracing` output to the browser console, one console call per
/// event at the matching console level
pub fn init_logging(max_level: Level) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(MakeWebConsoleWriter::new())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Logging already initialized")
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn logging_installs_once() {
        assert!(init_logging(Level::DEBUG).is_ok());
        tracing::info!(to_x = 410.0, "console writer reached");
        assert!(init_logging(Level::DEBUG).is_err());
    }
}

//! Google Cast sender wiring.
//!
//! The Cast SDK is a plain script tag, so everything here goes through
//! `js_sys::Reflect` on `window.cast` / `window.chrome.cast`. Session state
//! changes are forwarded to the shared [`crate::player::PlayerController`].

use crate::settings::AppSettings;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::player::PlayerController;
#[cfg(target_arch = "wasm32")]
use crate::cast::{CastMedia, CastSession, CastSessionState};
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

const CAST_LAUNCHER_HOST_ID: &str = "saavnplay-cast-launcher";

/// Whether the Cast framework finished loading on this page.
#[derive(Clone, Copy)]
pub struct CastAvailableSignal(pub Signal<bool>);

#[cfg(target_arch = "wasm32")]
fn prop(target: &JsValue, key: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

#[cfg(target_arch = "wasm32")]
fn path(root: &JsValue, keys: &[&str]) -> Option<JsValue> {
    keys.iter().try_fold(root.clone(), |current, key| prop(&current, key))
}

#[cfg(target_arch = "wasm32")]
fn global_path(keys: &[&str]) -> Option<JsValue> {
    let window: JsValue = web_sys::window()?.into();
    path(&window, keys)
}

#[cfg(target_arch = "wasm32")]
fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Option<JsValue> {
    let function: Function = prop(target, method)?.dyn_into().ok()?;
    let args: Array = args.iter().collect();
    match function.apply(target, &args) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("cast call `{method}` failed: {e:?}");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn construct(keys: &[&str], args: &[JsValue]) -> Option<JsValue> {
    let constructor: Function = global_path(keys)?.dyn_into().ok()?;
    let args: Array = args.iter().collect();
    Reflect::construct(&constructor, &args).ok()
}

#[cfg(target_arch = "wasm32")]
fn set(target: &JsValue, key: &str, value: impl Into<JsValue>) {
    let _ = Reflect::set(target, &JsValue::from_str(key), &value.into());
}

/// [`CastSession`] backed by a `cast.framework.CastSession`.
#[cfg(target_arch = "wasm32")]
pub struct WebCastSession {
    session: JsValue,
}

#[cfg(target_arch = "wasm32")]
impl WebCastSession {
    pub fn new(session: JsValue) -> Self {
        Self { session }
    }

    fn media_session(&self) -> Option<JsValue> {
        call(&self.session, "getMediaSession", &[])
            .filter(|media| !media.is_undefined() && !media.is_null())
    }

    fn media_info(media: &CastMedia) -> Option<JsValue> {
        let info = construct(
            &["chrome", "cast", "media", "MediaInfo"],
            &[
                JsValue::from_str(&media.content_id),
                JsValue::from_str(&media.content_type),
            ],
        )?;

        let metadata = construct(&["chrome", "cast", "media", "MusicTrackMediaMetadata"], &[])?;
        set(&metadata, "title", media.title.as_str());
        set(&metadata, "artist", media.artist.as_str());
        set(&metadata, "albumName", media.album_name.as_str());
        if let Some(artwork) = media.artwork_url.as_deref() {
            if let Some(image) = construct(&["chrome", "cast", "Image"], &[JsValue::from_str(artwork)]) {
                set(&metadata, "images", Array::of1(&image));
            }
        }
        set(&info, "metadata", metadata);
        Some(info)
    }
}

#[cfg(target_arch = "wasm32")]
impl CastSession for WebCastSession {
    fn load(&mut self, media: &CastMedia, start_time: f64, autoplay: bool) {
        let Some(info) = Self::media_info(media) else {
            tracing::warn!("cast framework missing media constructors");
            return;
        };
        let Some(request) = construct(&["chrome", "cast", "media", "LoadRequest"], &[info]) else {
            return;
        };
        set(&request, "autoplay", autoplay);
        set(&request, "currentTime", start_time);

        let Some(promise) = call(&self.session, "loadMedia", &[request])
            .and_then(|value| value.dyn_into::<js_sys::Promise>().ok())
        else {
            return;
        };
        let title = media.title.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => tracing::debug!("cast loaded {title}"),
                Err(e) => tracing::warn!("cast load failed for {title}: {e:?}"),
            }
        });
    }

    fn play(&mut self) {
        if let (Some(media), Some(request)) = (
            self.media_session(),
            construct(&["chrome", "cast", "media", "PlayRequest"], &[]),
        ) {
            call(&media, "play", &[request]);
        }
    }

    fn pause(&mut self) {
        if let (Some(media), Some(request)) = (
            self.media_session(),
            construct(&["chrome", "cast", "media", "PauseRequest"], &[]),
        ) {
            call(&media, "pause", &[request]);
        }
    }

    fn seek(&mut self, time: f64) {
        if let (Some(media), Some(request)) = (
            self.media_session(),
            construct(&["chrome", "cast", "media", "SeekRequest"], &[]),
        ) {
            set(&request, "currentTime", time);
            call(&media, "seek", &[request]);
        }
    }

    fn set_volume(&mut self, volume: f64) {
        let Some(media) = self.media_session() else {
            return;
        };
        let Some(level) = construct(&["chrome", "cast", "Volume"], &[JsValue::from_f64(volume)])
        else {
            return;
        };
        if let Some(request) = construct(&["chrome", "cast", "media", "VolumeRequest"], &[level]) {
            call(&media, "setVolume", &[request]);
        }
    }

    fn stop(&mut self) {
        call(&self.session, "endSession", &[JsValue::TRUE]);
    }
}

/// Configures the shared `CastContext` and forwards session changes.
#[cfg(target_arch = "wasm32")]
fn initialize_cast_context(player: Signal<PlayerController>, mut available: Signal<bool>) -> bool {
    let Some(context) = global_path(&["cast", "framework", "CastContext"])
        .and_then(|class| call(&class, "getInstance", &[]))
    else {
        return false;
    };

    let options = Object::new();
    if let Some(app_id) = global_path(&["chrome", "cast", "media", "DEFAULT_MEDIA_RECEIVER_APP_ID"]) {
        set(&options, "receiverApplicationId", app_id);
    }
    if let Some(policy) = global_path(&["chrome", "cast", "AutoJoinPolicy", "ORIGIN_SCOPED"]) {
        set(&options, "autoJoinPolicy", policy);
    }
    call(&context, "setOptions", &[options.into()]);

    let Some(event_type) = global_path(&[
        "cast",
        "framework",
        "CastContextEventType",
        "SESSION_STATE_CHANGED",
    ]) else {
        return false;
    };

    let runtime = Runtime::current();
    let listener = Closure::wrap(Box::new(move |event: JsValue| {
        let _guard = RuntimeGuard::new(runtime.clone());
        let state = prop(&event, "sessionState")
            .and_then(|value| value.as_string())
            .map(|name| CastSessionState::from_framework(&name))
            .unwrap_or(CastSessionState::Other);

        let mut player = player;
        let Ok(mut controller) = player.try_write() else {
            return;
        };
        match state {
            state if state.is_active() => {
                if let Some(session) = prop(&event, "session") {
                    controller.connect_cast(Box::new(WebCastSession::new(session)));
                }
            }
            CastSessionState::Ended => controller.disconnect_cast(),
            _ => {}
        }
    }) as Box<dyn FnMut(JsValue)>);

    call(
        &context,
        "addEventListener",
        &[event_type, listener.as_ref().clone()],
    );
    // The context lives for the whole page.
    listener.forget();

    available.set(true);
    tracing::info!("cast framework ready");
    true
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn CastBridge() -> Element {
    let settings = use_context::<Signal<AppSettings>>();
    let player = use_context::<Signal<PlayerController>>();
    let available = use_context::<CastAvailableSignal>().0;

    use_effect(move || {
        if !settings.peek().cast_enabled {
            return;
        }
        if initialize_cast_context(player, available) {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };

        // SDK not loaded yet: it calls this hook once it is.
        let runtime = Runtime::current();
        let on_available = Closure::wrap(Box::new(move |is_available: bool| {
            let _guard = RuntimeGuard::new(runtime.clone());
            if is_available {
                initialize_cast_context(player, available);
            } else {
                tracing::info!("cast framework reported unavailable");
            }
        }) as Box<dyn FnMut(bool)>);
        let window: JsValue = window.into();
        set(&window, "__onGCastApiAvailable", on_available.as_ref().clone());
        on_available.forget();
    });

    rsx! {}
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn CastBridge() -> Element {
    let settings = use_context::<Signal<AppSettings>>();

    use_effect(move || {
        if settings.peek().cast_enabled {
            tracing::debug!("cast is only available on web builds");
        }
    });

    rsx! {}
}

/// Hosts the SDK's `<google-cast-launcher>` button once the framework is up.
#[component]
pub fn CastButton() -> Element {
    let available = use_context::<CastAvailableSignal>().0;

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        if !available() {
            return;
        }
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(host) = document.get_element_by_id(CAST_LAUNCHER_HOST_ID) else {
            return;
        };
        if host.child_element_count() > 0 {
            return;
        }
        if let Ok(launcher) = document.create_element("google-cast-launcher") {
            let _ = host.append_child(&launcher);
        }
    });

    if !available() {
        return rsx! {};
    }

    rsx! {
        div {
            id: CAST_LAUNCHER_HOST_ID,
            class: "flex items-center justify-center w-6 h-6 cursor-pointer",
        }
    }
}

//! Audio Manager - binds the page's single `<audio>` element to the shared
//! [`PlayerController`]. The element's listeners live exactly as long as the
//! mounted `AudioController`.

use crate::player::PlayerController;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::player::{MediaEvent, MediaHandle, MediaListener, MediaSignals, Subscription};
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

#[cfg(target_arch = "wasm32")]
const AUDIO_ELEMENT_ID: &str = "saavnplay-audio";

#[cfg(target_arch = "wasm32")]
const MEDIA_EVENTS: [&str; 4] = ["timeupdate", "loadedmetadata", "ended", "error"];

/// Initialize the global audio element once.
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

#[cfg(target_arch = "wasm32")]
fn web_playback_error_message(audio: &HtmlAudioElement) -> String {
    let audio_js = wasm_bindgen::JsValue::from(audio.clone());
    let code = js_sys::Reflect::get(&audio_js, &"error".into())
        .ok()
        .filter(|error| !error.is_null() && !error.is_undefined())
        .and_then(|error| js_sys::Reflect::get(&error, &"code".into()).ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u16;

    match code {
        1 => "Playback was aborted before the stream loaded.",
        2 => "Network error while loading this track.",
        3 => "Audio playback failed due to a decode error.",
        4 => "Failed to load audio because no supported source was found.",
        _ => "Unable to load this audio source.",
    }
    .to_string()
}

#[cfg(target_arch = "wasm32")]
fn media_event(name: &str, audio: &HtmlAudioElement) -> Option<MediaEvent> {
    match name {
        "timeupdate" => Some(MediaEvent::TimeUpdate(audio.current_time())),
        "loadedmetadata" => Some(MediaEvent::MetadataLoaded(audio.duration())),
        "ended" => Some(MediaEvent::Ended),
        "error" => Some(MediaEvent::Error(web_playback_error_message(audio))),
        _ => None,
    }
}

/// [`MediaHandle`] over an `HtmlAudioElement`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct WebAudioHandle {
    audio: HtmlAudioElement,
}

#[cfg(target_arch = "wasm32")]
impl WebAudioHandle {
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }

    fn listen(&self, name: &'static str, listener: MediaListener) -> Subscription {
        let source = self.audio.clone();
        let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(event) = media_event(name, &source) {
                listener(event);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) = self
            .audio
            .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to attach `{name}` listener: {e:?}");
            return Subscription::noop();
        }

        let target = self.audio.clone();
        Subscription::new(move || {
            let _ = target.remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl MediaHandle for WebAudioHandle {
    fn set_source(&mut self, url: &str) {
        self.audio.set_src(url);
        self.audio.load();
    }

    fn play(&mut self) {
        // Autoplay policy rejections surface through the element's own events.
        if let Ok(promise) = self.audio.play() {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    tracing::debug!("play() rejected: {e:?}");
                }
            });
        }
    }

    fn pause(&mut self) {
        let _ = self.audio.pause();
    }

    fn set_position(&mut self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.audio.set_volume(volume);
    }
}

#[cfg(target_arch = "wasm32")]
impl MediaSignals for WebAudioHandle {
    fn subscribe(&self, listener: MediaListener) -> Subscription {
        let subscriptions = MEDIA_EVENTS
            .iter()
            .map(|name| self.listen(*name, listener.clone()))
            .collect();
        Subscription::all(subscriptions)
    }
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let player = use_context::<Signal<PlayerController>>();
    let mut subscription = use_signal(|| None::<Subscription>);

    use_effect(move || {
        let Some(audio) = get_or_create_audio_element() else {
            tracing::warn!("no document available for the audio element");
            return;
        };
        let handle = WebAudioHandle::new(audio);

        // Element callbacks run outside the Dioxus runtime.
        let runtime = Runtime::current();
        let listener: MediaListener = Rc::new(move |event: MediaEvent| {
            let _guard = RuntimeGuard::new(runtime.clone());
            let mut player = player;
            // Skip events delivered after teardown or during a controller write.
            if let Ok(mut controller) = player.try_write() {
                controller.handle_media_event(event);
            }
        });

        subscription.set(Some(handle.subscribe(listener)));
        let mut player = player;
        player.write().bind_media(Box::new(handle));
    });

    use_drop(move || {
        drop(subscription.write().take());
        let mut player = player;
        if let Ok(mut controller) = player.try_write() {
            controller.unbind_media();
        }
    });

    rsx! {}
}

/// Native webviews get no bound output; the controller keeps its state only.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    let player = use_context::<Signal<PlayerController>>();

    use_effect(move || {
        if !player.peek().has_media() {
            tracing::info!("audio output is only bound on web builds");
        }
    });

    rsx! {}
}

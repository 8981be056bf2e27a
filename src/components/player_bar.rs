use crate::components::{use_app_settings, CastButton};
use crate::player::{PlaybackStatus, PlayerController};
use dioxus::prelude::*;

/// Fixed bottom bar. Every control dispatches into the shared controller.
#[component]
pub fn PlayerBar() -> Element {
    let mut player = use_context::<Signal<PlayerController>>();
    let settings = use_app_settings();

    let controller = player.read();
    let state = controller.state().clone();
    let has_previous = controller.queue().has_previous();
    let has_next = controller.queue().has_next();
    let queue_len = controller.queue().len();
    let is_casting = controller.is_casting();
    drop(controller);

    let Some(song) = state.current.clone() else {
        return rsx! {};
    };

    let cover_url = song
        .image_url(&settings.thumbnail_quality)
        .map(str::to_string);
    let elapsed = state.elapsed_label();
    let total = state.duration_label();
    let progress = (state.progress() * 100.0).round();
    let volume = (state.volume * 100.0).round();
    let is_loading = state.status == PlaybackStatus::Loading;
    let error = state.last_error.as_ref().map(|e| e.to_string());

    let on_seek = move |e: Event<FormData>| {
        if let Ok(percent) = e.value().parse::<f64>() {
            let duration = player.peek().state().duration;
            if duration > 0.0 {
                player.write().seek(duration * percent / 100.0);
            }
        }
    };

    let on_volume_change = move |e: Event<FormData>| {
        if let Ok(value) = e.value().parse::<f64>() {
            player.write().set_volume((value / 100.0).clamp(0.0, 1.0));
        }
    };

    rsx! {
        div {
            class: if state.is_fullscreen { "player-bar player-bar--fullscreen" } else { "player-bar" },
            div { class: "flex items-center gap-3 px-4 py-2",
                if let Some(url) = cover_url {
                    img { class: "w-12 h-12 rounded object-cover", src: "{url}", alt: "{song.name}" }
                }
                div { class: "min-w-0 flex-1",
                    p { class: "truncate text-sm font-semibold", "{song.name}" }
                    p { class: "truncate text-xs text-zinc-400", "{song.primary_artists}" }
                    if let Some(message) = error {
                        p {
                            class: "truncate text-xs text-red-400",
                            onclick: move |_| player.write().clear_error(),
                            "{message}"
                        }
                    }
                }

                button {
                    id: "prev-btn",
                    disabled: !has_previous,
                    onclick: move |_| player.write().play_previous(),
                    "Prev"
                }
                button {
                    id: "play-pause-btn",
                    aria_busy: is_loading,
                    onclick: move |_| player.write().toggle_play(),
                    if state.is_playing { "Pause" } else { "Play" }
                }
                button {
                    id: "next-btn",
                    disabled: !has_next,
                    onclick: move |_| player.write().play_next(),
                    "Next"
                }

                span { class: "text-xs tabular-nums text-zinc-400", "{elapsed} / {total}" }
                input {
                    r#type: "range",
                    min: "0",
                    max: "100",
                    value: "{progress}",
                    oninput: on_seek,
                }

                button {
                    onclick: move |_| player.write().toggle_mute(),
                    if state.is_muted() { "Unmute" } else { "Mute" }
                }
                input {
                    r#type: "range",
                    min: "0",
                    max: "100",
                    value: "{volume}",
                    oninput: on_volume_change,
                }

                span { class: "text-xs text-zinc-500", "{queue_len} in queue" }
                if queue_len > 0 {
                    button { onclick: move |_| player.write().clear_queue(), "Clear" }
                }
                if is_casting {
                    button { onclick: move |_| player.write().stop_casting(), "Stop casting" }
                }
                CastButton {}
                button {
                    onclick: move |_| {
                        let fullscreen = player.peek().state().is_fullscreen;
                        player.write().set_fullscreen(!fullscreen);
                    },
                    if state.is_fullscreen { "Minimize" } else { "Expand" }
                }
            }
        }
    }
}

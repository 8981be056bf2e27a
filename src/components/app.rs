use crate::api::CatalogClient;
use crate::cache_service;
use crate::components::{AudioController, CastAvailableSignal, CastBridge, PlayerBar, SongFeed};
use crate::player::PlayerController;
use crate::settings::{load_settings_or_default, save_settings, AppSettings};
use dioxus::prelude::*;

const CAST_SENDER_SDK: &str =
    "https://www.gstatic.com/cv/js/sender/v1/cast_sender.js?loadCastFramework=1";

/// Root component. Builds the session's settings, catalog client and player
/// once and hands them down through context.
#[component]
pub fn App() -> Element {
    let initial_settings = use_hook(load_settings_or_default);
    let mut settings = use_signal(|| initial_settings.clone());
    let player = use_signal(|| PlayerController::from_settings(&initial_settings));
    let cast_available = use_signal(|| false);
    let catalog = use_memo(move || CatalogClient::from_settings(&settings()));
    let mut persisted = use_signal(|| initial_settings.clone());
    let mut query = use_signal(String::new);

    use_context_provider(|| settings);
    use_context_provider(|| player);
    use_context_provider(|| catalog);
    use_context_provider(|| CastAvailableSignal(cast_available));

    // Cache limits follow the settings.
    use_effect(move || {
        cache_service::apply_settings(&settings.read());
    });

    // Mirror the player's volume into settings so it survives reloads.
    use_effect(move || {
        let volume = player.read().state().volume;
        if (settings.peek().volume - volume).abs() > 0.01 {
            settings.write().volume = volume;
        }
    });

    use_effect(move || {
        let current = settings();
        if *persisted.peek() == current {
            return;
        }
        persisted.set(current.clone());
        if let Err(e) = save_settings(&current) {
            tracing::warn!("failed to save settings: {e}");
        }
    });

    let cast_enabled = settings.read().cast_enabled;
    let search = query();

    rsx! {
        if cast_enabled {
            document::Script { src: CAST_SENDER_SDK }
        }

        div { class: "app-container flex flex-col min-h-screen text-white",
            header { class: "border-b border-zinc-800/60 bg-zinc-950/80 px-4 py-3",
                input {
                    class: "w-full rounded-lg bg-zinc-900 px-3 py-2 text-sm",
                    r#type: "search",
                    placeholder: "Search songs",
                    value: "{search}",
                    oninput: move |e: Event<FormData>| query.set(e.value()),
                }
            }

            main { class: "flex-1 overflow-y-auto main-scroll",
                if search.trim().is_empty() {
                    p { class: "p-6 text-zinc-500", "Search the catalog to start listening." }
                } else {
                    SongFeed { key: "{search}", query: search.clone() }
                }
            }

            PlayerBar {}
        }

        AudioController {}
        CastBridge {}
    }
}

/// Current settings snapshot for components outside the root.
pub fn use_app_settings() -> AppSettings {
    use_context::<Signal<AppSettings>>()()
}

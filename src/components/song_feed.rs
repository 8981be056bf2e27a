use crate::api::{format_duration, CatalogClient, Song};
use crate::components::{use_app_settings, use_infinite_scroll, ScrollSentinel};
use crate::pagination::PageCursor;
use crate::player::PlayerController;
use dioxus::prelude::*;

const FEED_SENTINEL_ID: &str = "song-feed-sentinel";

/// Paged song search results. Remount (via `key`) to start a new query.
#[component]
pub fn SongFeed(query: String) -> Element {
    let catalog = use_context::<Memo<CatalogClient>>();
    let mut player = use_context::<Signal<PlayerController>>();
    let settings = use_app_settings();
    let songs = use_signal(Vec::<Song>::new);
    let cursor = use_signal(PageCursor::new);

    let feed_query = query.clone();
    let scroll = use_infinite_scroll(FEED_SENTINEL_ID, settings.scroll_options(), move || {
        let query = feed_query.clone();
        let client = catalog.peek().clone();
        let mut songs = songs;
        let mut cursor = cursor;
        async move {
            let Some(page) = cursor.peek().has_more().then(|| cursor.peek().page()) else {
                return Ok(());
            };
            let result = client
                .search_songs(&query, page)
                .await
                .map(|found| found.results);
            let fresh = cursor.write().apply(result);
            songs.write().extend(fresh);
            Ok::<(), String>(())
        }
    });

    let listing = songs();
    let has_more = cursor.read().has_more();
    let thumbnail_quality = settings.thumbnail_quality.clone();

    rsx! {
        ul { class: "divide-y divide-zinc-800/60",
            for song in listing.iter().cloned() {
                li {
                    key: "{song.id}",
                    class: "flex items-center gap-3 px-4 py-2 hover:bg-zinc-900 cursor-pointer",
                    onclick: {
                        let song = song.clone();
                        move |_| {
                            let queue = songs.peek().clone();
                            player.write().select_and_play(song.clone(), Some(queue));
                        }
                    },
                    if let Some(url) = song.image_url(&thumbnail_quality) {
                        img { class: "w-10 h-10 rounded object-cover", src: "{url}", alt: "" }
                    }
                    div { class: "min-w-0 flex-1",
                        p { class: "truncate text-sm", "{song.name}" }
                        p { class: "truncate text-xs text-zinc-400", "{song.primary_artists}" }
                    }
                    span { class: "text-xs tabular-nums text-zinc-500", {format_duration(song.duration)} }
                    button {
                        class: "px-2 text-zinc-400 hover:text-white",
                        aria_label: "Add to queue",
                        onclick: {
                            let song = song.clone();
                            move |e: MouseEvent| {
                                e.stop_propagation();
                                player.write().add_to_queue(song.clone());
                            }
                        },
                        "+"
                    }
                }
            }
        }

        if !has_more && listing.is_empty() {
            p { class: "p-6 text-zinc-500", "No results for \"{query}\"." }
        }

        ScrollSentinel { id: FEED_SENTINEL_ID.to_string(), loading: scroll.is_loading() }
    }
}

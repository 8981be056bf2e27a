//! SaavnPlay: catalog client, pagination driver and playback controller for a
//! browser music player built on Dioxus.

pub mod api;
pub mod cache;
pub mod cache_service;
pub mod cast;
pub mod components;
pub mod diagnostics;
pub mod pagination;
pub mod player;
pub mod settings;
pub mod utils;

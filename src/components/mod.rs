//! Root component and the browser bindings around the player core.

mod app;
mod audio_manager;
mod cast_bridge;
mod infinite_scroll;
mod player_bar;
mod song_feed;

pub use app::*;
pub use audio_manager::*;
pub use cast_bridge::*;
pub use infinite_scroll::*;
pub use player_bar::*;
pub use song_feed::*;

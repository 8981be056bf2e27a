use super::*;
use crate::api::StreamVariant;
use crate::cast::{CastMedia, CastSession};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Source(String),
    Play,
    Pause,
    Position(f64),
    Volume(f64),
}

#[derive(Clone, Default)]
struct FakeMedia(Rc<RefCell<Vec<Cmd>>>);

impl FakeMedia {
    fn log(&self) -> Vec<Cmd> {
        self.0.borrow().clone()
    }

    fn last_volume(&self) -> Option<f64> {
        self.0.borrow().iter().rev().find_map(|cmd| match cmd {
            Cmd::Volume(v) => Some(*v),
            _ => None,
        })
    }

    fn sources(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|cmd| match cmd {
                Cmd::Source(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn reset(&self) {
        self.0.borrow_mut().clear();
    }
}

impl MediaHandle for FakeMedia {
    fn set_source(&mut self, url: &str) {
        self.0.borrow_mut().push(Cmd::Source(url.to_string()));
    }
    fn play(&mut self) {
        self.0.borrow_mut().push(Cmd::Play);
    }
    fn pause(&mut self) {
        self.0.borrow_mut().push(Cmd::Pause);
    }
    fn set_position(&mut self, seconds: f64) {
        self.0.borrow_mut().push(Cmd::Position(seconds));
    }
    fn set_volume(&mut self, volume: f64) {
        self.0.borrow_mut().push(Cmd::Volume(volume));
    }
}

#[derive(Clone, Default)]
struct FakeReceiver(Rc<RefCell<Vec<String>>>);

impl CastSession for FakeReceiver {
    fn load(&mut self, media: &CastMedia, start_time: f64, autoplay: bool) {
        self.0
            .borrow_mut()
            .push(format!("load {} @{start_time} {autoplay}", media.title));
    }
    fn play(&mut self) {
        self.0.borrow_mut().push("play".into());
    }
    fn pause(&mut self) {
        self.0.borrow_mut().push("pause".into());
    }
    fn seek(&mut self, time: f64) {
        self.0.borrow_mut().push(format!("seek {time}"));
    }
    fn set_volume(&mut self, volume: f64) {
        self.0.borrow_mut().push(format!("volume {volume}"));
    }
    fn stop(&mut self) {
        self.0.borrow_mut().push("stop".into());
    }
}

fn track(id: &str) -> Song {
    Song {
        id: id.into(),
        name: id.to_uppercase(),
        download_url: vec![
            StreamVariant {
                quality: "96kbps".into(),
                link: format!("https://cdn/{id}_96.mp4"),
            },
            StreamVariant {
                quality: "320kbps".into(),
                link: format!("https://cdn/{id}_320.mp4"),
            },
        ],
        ..Default::default()
    }
}

fn abc() -> Vec<Song> {
    vec![track("a"), track("b"), track("c")]
}

fn bound() -> (PlayerController, FakeMedia) {
    let media = FakeMedia::default();
    let mut player = PlayerController::new();
    player.bind_media(Box::new(media.clone()));
    media.reset();
    (player, media)
}

fn current_id(player: &PlayerController) -> Option<&str> {
    player.current_track().map(|track| track.id.as_str())
}

#[test]
fn select_with_queue_points_at_the_selected_entry() {
    let queue = abc();
    for (i, entry) in queue.iter().enumerate() {
        let mut player = PlayerController::new();
        player.select_and_play(entry.clone(), Some(queue.clone()));
        assert_eq!(player.current_index(), i);
        assert_eq!(current_id(&player), Some(entry.id.as_str()));
        assert!(player.is_playing());
    }
}

#[test]
fn select_with_queue_missing_the_track_falls_back_to_first_index() {
    let mut player = PlayerController::new();
    player.select_and_play(track("z"), Some(abc()));
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("z"));
    assert_eq!(player.queue().len(), 3);
}

#[test]
fn select_without_queue_reuses_existing_entry() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.select_and_play(track("c"), None);
    assert_eq!(player.current_index(), 2);
    assert_eq!(player.queue().len(), 3);
    assert_eq!(current_id(&player), Some("c"));
}

#[test]
fn select_without_queue_replaces_queue_with_single_track() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.select_and_play(track("x"), None);
    assert_eq!(player.queue().len(), 1);
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("x"));
}

#[test]
fn select_with_empty_queue_plays_the_track_alone() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.select_and_play(track("x"), Some(Vec::new()));
    assert_eq!(player.queue().len(), 1);
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("x"));
    assert!(player.is_playing());
}

#[test]
fn skip_to_jumps_within_the_queue() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), Some(abc()));
    player.pause();
    media.reset();

    player.skip_to(2);
    assert_eq!(player.current_index(), 2);
    assert_eq!(current_id(&player), Some("c"));
    assert!(player.is_playing());
    assert_eq!(media.sources(), vec!["https://cdn/c_320.mp4".to_string()]);
}

#[test]
fn skip_to_out_of_range_is_ignored() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), Some(abc()));
    media.reset();

    player.skip_to(3);
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("a"));
    assert!(media.log().is_empty());
}

#[test]
fn select_retargets_source_to_preferred_quality_and_plays() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    assert_eq!(
        media.log(),
        vec![Cmd::Source("https://cdn/a_320.mp4".into()), Cmd::Play]
    );
    assert_eq!(player.state().status, PlaybackStatus::Loading);
}

#[test]
fn unresolvable_stream_leaves_media_untouched_and_records_error() {
    let (mut player, media) = bound();
    let silent = Song {
        id: "silent".into(),
        ..Default::default()
    };
    player.select_and_play(silent, None);
    assert!(media.log().is_empty());
    assert_eq!(
        player.state().last_error,
        Some(PlaybackError::NoStreamVariant {
            track_id: "silent".into()
        })
    );
    assert_eq!(player.state().status, PlaybackStatus::Idle);
}

#[test]
fn play_next_at_end_is_a_no_op() {
    let mut player = PlayerController::new();
    player.select_and_play(track("c"), Some(abc()));
    player.pause();
    player.play_next();
    assert_eq!(player.current_index(), 2);
    assert_eq!(current_id(&player), Some("c"));
    assert!(!player.is_playing());
}

#[test]
fn play_previous_at_start_is_a_no_op() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), Some(abc()));
    media.reset();
    player.play_previous();
    assert_eq!(player.current_index(), 0);
    assert!(media.log().is_empty());
}

#[test]
fn play_previous_steps_back_and_plays() {
    let (mut player, media) = bound();
    player.select_and_play(track("c"), Some(abc()));
    player.pause();
    media.reset();
    player.play_previous();
    assert_eq!(player.current_index(), 1);
    assert_eq!(current_id(&player), Some("b"));
    assert!(player.is_playing());
    assert_eq!(media.sources(), vec!["https://cdn/b_320.mp4".to_string()]);
}

#[test]
fn ended_mid_queue_matches_play_next() {
    let mut by_event = PlayerController::new();
    by_event.select_and_play(track("a"), Some(abc()));
    by_event.handle_media_event(MediaEvent::Ended);

    let mut by_call = PlayerController::new();
    by_call.select_and_play(track("a"), Some(abc()));
    by_call.play_next();

    assert_eq!(by_event.current_index(), by_call.current_index());
    assert_eq!(by_event.state(), by_call.state());
    assert_eq!(current_id(&by_event), Some("b"));
}

#[test]
fn ended_at_last_entry_stops_without_clearing_track() {
    let mut player = PlayerController::new();
    player.select_and_play(track("c"), Some(abc()));
    player.handle_media_event(MediaEvent::MetadataLoaded(200.0));
    player.handle_media_event(MediaEvent::Ended);
    assert!(!player.is_playing());
    assert_eq!(current_id(&player), Some("c"));
    assert_eq!(player.current_index(), 2);
    assert_eq!(player.state().status, PlaybackStatus::Ended);
}

#[test]
fn removing_current_last_entry_moves_to_new_last() {
    let mut player = PlayerController::new();
    player.select_and_play(track("c"), Some(abc()));
    player.remove_from_queue(2);
    assert_eq!(player.current_index(), 1);
    assert_eq!(current_id(&player), Some("b"));
    assert_eq!(player.queue().len(), 2);
}

#[test]
fn removing_current_first_entry_moves_to_following_track() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.remove_from_queue(0);
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("b"));
}

#[test]
fn removing_an_earlier_entry_keeps_pointing_at_current_track() {
    let mut player = PlayerController::new();
    player.select_and_play(track("c"), Some(abc()));
    player.remove_from_queue(0);
    assert_eq!(player.current_index(), 1);
    assert_eq!(current_id(&player), Some("c"));
    assert_eq!(player.queue().current().map(|t| t.id.as_str()), Some("c"));
}

#[test]
fn removing_out_of_range_index_is_ignored() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.remove_from_queue(7);
    assert_eq!(player.queue().len(), 3);
}

#[test]
fn add_to_queue_appends_without_changing_current() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.add_to_queue(track("d"));
    assert_eq!(player.queue().len(), 4);
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("a"));
}

#[test]
fn clear_queue_keeps_loaded_track_playing() {
    let (mut player, media) = bound();
    player.select_and_play(track("b"), Some(abc()));
    media.reset();
    player.clear_queue();
    assert!(player.queue().is_empty());
    assert_eq!(player.current_index(), 0);
    assert_eq!(current_id(&player), Some("b"));
    assert!(player.is_playing());
    assert!(media.log().is_empty());
}

#[test]
fn pause_and_resume_without_track_do_nothing() {
    let (mut player, media) = bound();
    player.resume();
    assert!(!player.is_playing());
    player.pause();
    assert!(media.log().is_empty());
}

#[test]
fn pause_and_resume_reach_the_media_handle() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    player.handle_media_event(MediaEvent::MetadataLoaded(180.0));
    media.reset();

    player.pause();
    assert_eq!(player.state().status, PlaybackStatus::Paused);
    player.toggle_play();
    assert_eq!(player.state().status, PlaybackStatus::Playing);
    assert_eq!(media.log(), vec![Cmd::Pause, Cmd::Play]);
}

#[test]
fn seek_without_media_is_ignored() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), None);
    player.seek(42.0);
    assert_eq!(player.state().position, 0.0);
}

#[test]
fn seek_updates_position_optimistically() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    media.reset();
    player.seek(42.0);
    assert_eq!(player.state().position, 42.0);
    assert_eq!(media.log(), vec![Cmd::Position(42.0)]);
}

#[test]
fn volume_round_trips_through_state_and_handle() {
    let (mut player, media) = bound();
    player.set_volume(0.0);
    assert_eq!(player.state().volume, 0.0);
    assert_eq!(media.last_volume(), Some(0.0));
    player.set_volume(1.0);
    assert_eq!(player.state().volume, 1.0);
    assert_eq!(media.last_volume(), Some(1.0));
}

#[test]
fn toggle_mute_restores_previous_level() {
    let (mut player, media) = bound();
    player.set_volume(0.4);
    player.toggle_mute();
    assert!(player.state().is_muted());
    player.toggle_mute();
    assert_eq!(player.state().volume, 0.4);
    assert_eq!(media.last_volume(), Some(0.4));
}

#[test]
fn fullscreen_flag_has_no_side_effects() {
    let (mut player, media) = bound();
    player.set_fullscreen(true);
    assert!(player.state().is_fullscreen);
    player.set_fullscreen(false);
    assert!(!player.state().is_fullscreen);
    assert!(media.log().is_empty());
}

#[test]
fn media_events_update_clock() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), None);
    player.handle_media_event(MediaEvent::MetadataLoaded(f64::NAN));
    assert_eq!(player.state().duration, 0.0);
    player.handle_media_event(MediaEvent::MetadataLoaded(245.0));
    player.handle_media_event(MediaEvent::TimeUpdate(61.4));
    assert_eq!(player.state().duration, 245.0);
    assert_eq!(player.state().elapsed_label(), "1:01");
    assert_eq!(player.state().duration_label(), "4:05");
    assert_eq!(player.state().status, PlaybackStatus::Playing);
}

#[test]
fn media_error_is_recorded_without_touching_queue() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.handle_media_event(MediaEvent::Error("decode".into()));
    assert!(matches!(
        player.state().last_error,
        Some(PlaybackError::LoadFailed { ref reason, .. }) if reason == "decode"
    ));
    assert!(player.is_playing());
    assert_eq!(player.current_index(), 0);
    player.clear_error();
    assert!(player.state().last_error.is_none());
}

#[test]
fn three_track_scenario_stops_at_the_end() {
    let mut player = PlayerController::new();
    player.select_and_play(track("a"), Some(abc()));
    player.play_next();
    player.play_next();
    player.play_next();
    assert_eq!(current_id(&player), Some("c"));
    assert_eq!(player.current_index(), 2);
    assert!(player.is_playing());
    assert_eq!(player.queue().len(), 3);
}

#[test]
fn binding_late_loads_the_selected_track() {
    let mut player = PlayerController::new();
    player.set_volume(0.5);
    player.select_and_play(track("a"), None);

    let media = FakeMedia::default();
    player.bind_media(Box::new(media.clone()));
    assert_eq!(
        media.log(),
        vec![
            Cmd::Volume(0.5),
            Cmd::Source("https://cdn/a_320.mp4".into()),
            Cmd::Play
        ]
    );
    assert!(player.unbind_media().is_some());
    assert!(!player.has_media());
}

#[test]
fn event_hub_feeds_controller_until_unsubscribed() {
    let player = Rc::new(RefCell::new(PlayerController::new()));
    player
        .borrow_mut()
        .select_and_play(track("a"), Some(abc()));

    let hub = EventHub::new();
    let sink = player.clone();
    let subscription = hub.subscribe(Rc::new(move |event: MediaEvent| {
        sink.borrow_mut().handle_media_event(event);
    }));
    assert_eq!(hub.listener_count(), 1);

    hub.emit(MediaEvent::TimeUpdate(12.0));
    hub.emit(MediaEvent::Ended);
    assert_eq!(player.borrow().current_index(), 1);

    drop(subscription);
    assert_eq!(hub.listener_count(), 0);
    hub.emit(MediaEvent::Ended);
    assert_eq!(player.borrow().current_index(), 1);
}

#[test]
fn combined_subscription_releases_every_listener() {
    let hub = EventHub::new();
    let first = hub.subscribe(Rc::new(|_: MediaEvent| {}));
    let second = hub.subscribe(Rc::new(|_: MediaEvent| {}));
    let all = Subscription::all(vec![first, second]);
    assert_eq!(hub.listener_count(), 2);
    drop(all);
    assert_eq!(hub.listener_count(), 0);
}

#[test]
fn cast_session_takes_over_transport() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), Some(abc()));
    player.handle_media_event(MediaEvent::TimeUpdate(30.0));
    media.reset();

    let receiver = FakeReceiver::default();
    player.connect_cast(Box::new(receiver.clone()));
    assert!(player.is_casting());
    assert_eq!(media.log(), vec![Cmd::Pause]);

    player.pause();
    player.play_next();
    assert_eq!(
        receiver.0.borrow().clone(),
        vec![
            "volume 1".to_string(),
            "load A @30 true".to_string(),
            "pause".to_string(),
            "load B @0 true".to_string(),
        ]
    );
    assert_eq!(
        media.log(),
        vec![Cmd::Pause, Cmd::Source("https://cdn/b_320.mp4".into())]
    );
}

#[test]
fn ending_cast_resumes_locally_from_last_position() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    player.connect_cast(Box::new(FakeReceiver::default()));
    player.seek(75.0);
    media.reset();

    player.disconnect_cast();
    assert!(!player.is_casting());
    assert_eq!(media.log(), vec![Cmd::Position(75.0), Cmd::Play]);
}

#[test]
fn stopping_cast_from_the_app_resumes_locally() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    let receiver = FakeReceiver::default();
    player.connect_cast(Box::new(receiver.clone()));
    player.seek(75.0);
    media.reset();

    player.stop_casting();
    assert!(!player.is_casting());
    assert_eq!(receiver.0.borrow().last().map(String::as_str), Some("stop"));
    assert_eq!(media.log(), vec![Cmd::Position(75.0), Cmd::Play]);

    // The framework's session-ended report arrives afterwards.
    player.disconnect_cast();
    assert_eq!(media.log(), vec![Cmd::Position(75.0), Cmd::Play]);
}

#[test]
fn stopping_cast_while_paused_restores_position_only() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    player.connect_cast(Box::new(FakeReceiver::default()));
    player.seek(12.0);
    player.pause();
    media.reset();

    player.stop_casting();
    assert_eq!(media.log(), vec![Cmd::Position(12.0)]);
}

#[test]
fn stopping_cast_without_a_session_does_nothing() {
    let (mut player, media) = bound();
    player.select_and_play(track("a"), None);
    media.reset();

    player.stop_casting();
    assert!(media.log().is_empty());
}

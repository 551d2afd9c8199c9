//! Player transport view model.
//!
//! Mirrors the daemon's player status and current track, replaced
//! wholesale on every update, and turns button and slider intents into
//! commands. Two timer behaviors live here:
//! * the status re-poll: roughly once per second for as long as status
//!   messages keep arriving, re-armed (not fixed-rate) on every update
//! * input coalescing for volume and seek changes, so a dragged slider
//!   sends one command, not dozens

use std::sync::{Arc, Mutex};

use crate::{
    config::Config,
    dispatcher::Dispatcher,
    protocol::{Command, PlaybackState, PlayerStatus, Track},
    timer::DebounceSlot,
    transport::Transport,
};

#[derive(Default)]
struct Inner {
    status: Option<PlayerStatus>,
    current: Option<Track>,
    poll: DebounceSlot,
    volume: DebounceSlot,
    seek: DebounceSlot,
}

/// Handle to the shared player state; clones observe the same player.
#[derive(Clone)]
pub struct Player {
    inner: Arc<Mutex<Inner>>,
    transport: Transport,
    config: Config,
}

impl Player {
    /// Creates the player and registers its observers. Call before the
    /// transport starts consuming the dispatcher.
    pub fn attach(dispatcher: &mut Dispatcher, transport: Transport, config: &Config) -> Self {
        let player = Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            transport,
            config: config.clone(),
        };

        let on_status = player.clone();
        dispatcher.on_status(move |status| on_status.apply_status(status));

        let on_current = player.clone();
        dispatcher.on_current_song(move |track| on_current.apply_current(track));

        player
    }

    /// The last status, if any arrived yet.
    #[must_use]
    pub fn status(&self) -> Option<PlayerStatus> {
        self.inner.lock().ok()?.status.clone()
    }

    /// The current track as last reported.
    #[must_use]
    pub fn current_track(&self) -> Option<Track> {
        self.inner.lock().ok()?.current.clone()
    }

    /// Display line for the current track: the non-empty parts of title,
    /// album and artist.
    #[must_use]
    pub fn now_playing(&self) -> Option<String> {
        let track = self.current_track()?;
        let mut parts = vec![track.title_or_file().to_owned()];
        parts.extend(track.album.iter().cloned());
        parts.extend(track.artist.iter().cloned());
        Some(parts.join(" - "))
    }

    fn apply_status(&self, status: &PlayerStatus) {
        let Ok(mut inner) = self.inner.lock() else {
            debug!("player state poisoned");
            return;
        };

        // Fetch track details once per song change.
        let previous = inner.status.as_ref().and_then(|status| status.song_id);
        if status.song_id.is_some() && status.song_id != previous {
            self.transport.send(Command::CurrentSong);
        }

        inner.status = Some(status.clone());

        // Keepalive cadence: ask again in a second, unless a fresh status
        // arrives first and re-arms the slot.
        let transport = self.transport.clone();
        inner.poll.arm(self.config.status_poll, move || {
            transport.send(Command::Status);
        });
    }

    fn apply_current(&self, track: &Track) {
        let Ok(mut inner) = self.inner.lock() else {
            debug!("player state poisoned");
            return;
        };
        inner.current = Some(track.clone());
    }

    pub fn previous(&self) {
        self.transport.send(Command::Previous);
    }

    pub fn next(&self) {
        self.transport.send(Command::Next);
    }

    /// The pause button: resumes from stop, otherwise toggles pause.
    pub fn toggle_pause(&self) {
        let state = self
            .status()
            .map_or(PlaybackState::Stop, |status| status.state);

        match state {
            PlaybackState::Stop => self.transport.send(Command::Play { pos: -1 }),
            state => self.transport.send(Command::Pause {
                pause: state == PlaybackState::Play,
            }),
        }
    }

    pub fn toggle_random(&self) {
        let random = self.status().is_some_and(|status| status.random);
        self.transport.send(Command::Random { random: !random });
    }

    pub fn toggle_repeat(&self) {
        let repeat = self.status().is_some_and(|status| status.repeat);
        self.transport.send(Command::Repeat { repeat: !repeat });
    }

    /// Volume slider input, coalesced over the input debounce period.
    pub fn set_volume(&self, volume: i8) {
        let Ok(mut inner) = self.inner.lock() else {
            debug!("player state poisoned");
            return;
        };

        let transport = self.transport.clone();
        inner.volume.arm(self.config.input_debounce, move || {
            transport.send(Command::SetVolume { volume });
        });
    }

    /// Seek slider input, coalesced. A seek without a current song is a
    /// no-op; the list may have emptied underneath the slider.
    pub fn seek(&self, time: u64) {
        let Ok(mut inner) = self.inner.lock() else {
            debug!("player state poisoned");
            return;
        };

        let Some(id) = inner.status.as_ref().and_then(|status| status.song_id) else {
            debug!("seek without a current song");
            return;
        };

        let transport = self.transport.clone();
        inner.seek.arm(self.config.input_debounce, move || {
            transport.send(Command::SeekId { id, time });
        });
    }
}

//! Typed fan-out of decoded server updates.
//!
//! Views register observers per update kind before the transport starts;
//! the transport's connection task then owns the dispatcher and delivers
//! every decoded [`Update`] to the observers for its kind, in registration
//! order. There is no removal API: registrations live for the process.
//!
//! This layer provides ordering and fan-out only, not isolation. An
//! observer that can fail must defend itself; a kind without observers is
//! a silent no-op.

use crate::protocol::{PlayerStatus, Track, Update};

type Observer<T> = Box<dyn Fn(&T) + Send>;

/// Registry of observers, one ordered list per update kind.
#[derive(Default)]
pub struct Dispatcher {
    current_song: Vec<Observer<Track>>,
    files: Vec<Observer<[String]>>,
    playlist: Vec<Observer<[Track]>>,
    status: Vec<Observer<PlayerStatus>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_current_song(&mut self, observer: impl Fn(&Track) + Send + 'static) {
        self.current_song.push(Box::new(observer));
    }

    pub fn on_files(&mut self, observer: impl Fn(&[String]) + Send + 'static) {
        self.files.push(Box::new(observer));
    }

    pub fn on_playlist(&mut self, observer: impl Fn(&[Track]) + Send + 'static) {
        self.playlist.push(Box::new(observer));
    }

    pub fn on_status(&mut self, observer: impl Fn(&PlayerStatus) + Send + 'static) {
        self.status.push(Box::new(observer));
    }

    /// Delivers an update to every observer registered for its kind.
    pub fn deliver(&self, update: &Update) {
        match update {
            Update::CurrentSong(track) => {
                for observer in &self.current_song {
                    observer(track);
                }
            }
            Update::Files(files) => {
                for observer in &self.files {
                    observer(files.as_slice());
                }
            }
            Update::Playlist(tracks) => {
                for observer in &self.playlist {
                    observer(tracks.as_slice());
                }
            }
            Update::Status(status) => {
                for observer in &self.status {
                    observer(status);
                }
            }
        }
    }
}

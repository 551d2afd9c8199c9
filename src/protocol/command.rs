//! Outbound commands for the daemon.
//!
//! Every command serializes to a self-describing JSON record carrying the
//! command name in a `Cmd` tag next to its arguments, so no two argument
//! sets can be confused on the wire:
//!
//! ```json
//! {"Cmd": "Move", "Start": 2, "End": 5, "Pos": 4}
//! ```
//!
//! Commands are immutable value objects; list positions are zero-based.
//! `Pos` is signed where the daemon accepts `-1` as "append" ([`AddMulti`])
//! or "resume" ([`Play`]).
//!
//! [`AddMulti`]: Command::AddMulti
//! [`Play`]: Command::Play

use std::fmt;

use serde::Serialize;

/// A named action with a fixed argument schema per name.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "Cmd", rename_all_fields = "PascalCase")]
pub enum Command {
    /// Request the flat list of all database uris.
    GetFiles,

    /// Append a single uri to the playlist.
    Add { uri: String },

    /// Insert several uris at a position, or append when `pos` is negative.
    AddMulti { uris: Vec<String>, pos: i64 },

    /// Remove all playlist entries.
    Clear,

    /// Move the range `[start, end)` to `pos`.
    ///
    /// `pos` is interpreted by the daemon against the list as it stands
    /// after the source range was taken out; see
    /// [`Reconciler`](crate::reconciler::Reconciler) for the correction.
    Move {
        start: usize,
        end: usize,
        pos: usize,
    },

    /// Move the track with the given id to `pos`.
    MoveId { id: u64, pos: usize },

    /// Delete the range `[start, end)`.
    Delete { start: usize, end: usize },

    /// Delete the track with the given id.
    DeleteId { id: u64 },

    /// Request the full playlist snapshot.
    PlaylistInfo,

    /// Skip to the previous track.
    Previous,

    /// Skip to the next track.
    Next,

    /// Start playback at a position; `-1` resumes from the stopped state.
    Play { pos: i64 },

    /// Start playback of the track with the given id.
    PlayId { id: u64 },

    /// Pause (`true`) or resume (`false`) playback.
    Pause { pause: bool },

    /// Toggle random playback order.
    Random { random: bool },

    /// Toggle repeat mode.
    Repeat { repeat: bool },

    /// Set the output volume (0-100).
    SetVolume { volume: i8 },

    /// Seek to a second offset within the track with the given id.
    SeekId { id: u64, time: u64 },

    /// Request a fresh player status.
    Status,

    /// Request the currently playing track.
    CurrentSong,
}

impl Command {
    /// The wire name of this command.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetFiles => "GetFiles",
            Self::Add { .. } => "Add",
            Self::AddMulti { .. } => "AddMulti",
            Self::Clear => "Clear",
            Self::Move { .. } => "Move",
            Self::MoveId { .. } => "MoveId",
            Self::Delete { .. } => "Delete",
            Self::DeleteId { .. } => "DeleteId",
            Self::PlaylistInfo => "PlaylistInfo",
            Self::Previous => "Previous",
            Self::Next => "Next",
            Self::Play { .. } => "Play",
            Self::PlayId { .. } => "PlayId",
            Self::Pause { .. } => "Pause",
            Self::Random { .. } => "Random",
            Self::Repeat { .. } => "Repeat",
            Self::SetVolume { .. } => "SetVolume",
            Self::SeekId { .. } => "SeekId",
            Self::Status => "Status",
            Self::CurrentSong => "CurrentSong",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_unit_commands() {
        let encoded = serde_json::to_value(Command::Status).unwrap();
        assert_eq!(encoded, json!({"Cmd": "Status"}));
    }

    #[test]
    fn encodes_arguments_in_pascal_case() {
        let encoded = serde_json::to_value(Command::Move {
            start: 2,
            end: 5,
            pos: 4,
        })
        .unwrap();
        assert_eq!(encoded, json!({"Cmd": "Move", "Start": 2, "End": 5, "Pos": 4}));

        let encoded = serde_json::to_value(Command::AddMulti {
            uris: vec!["a.flac".to_owned(), "b.flac".to_owned()],
            pos: 3,
        })
        .unwrap();
        assert_eq!(
            encoded,
            json!({"Cmd": "AddMulti", "Uris": ["a.flac", "b.flac"], "Pos": 3})
        );
    }

    #[test]
    fn argument_sets_stay_unambiguous() {
        let encoded = serde_json::to_value(Command::SeekId { id: 7, time: 130 }).unwrap();
        assert_eq!(encoded, json!({"Cmd": "SeekId", "Id": 7, "Time": 130}));

        let encoded = serde_json::to_value(Command::Pause { pause: true }).unwrap();
        assert_eq!(encoded, json!({"Cmd": "Pause", "Pause": true}));

        let encoded = serde_json::to_value(Command::Play { pos: -1 }).unwrap();
        assert_eq!(encoded, json!({"Cmd": "Play", "Pos": -1}));
    }
}

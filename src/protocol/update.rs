//! Inbound server updates.
//!
//! The daemon relays MPD state as `{"Type": <kind>, "Data": <payload>}`
//! envelopes. Decoding happens in two steps so that malformed frames and
//! recognized-but-unsupported kinds stay distinguishable: the envelope is
//! parsed first, then the payload is decoded against the kind.
//!
//! Payloads originate from MPD attribute maps, which encode every value as
//! a string; numeric and boolean fields are therefore parsed from strings
//! here rather than pushed onto every consumer.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_with::{serde_as, DisplayFromStr};

use crate::error::{Error, Result};

/// The recognized update kinds.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    CurrentSong,
    Files,
    Playlist,
    Status,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A decoded server update, one variant per [`Kind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    /// The track MPD is currently playing.
    CurrentSong(Track),

    /// The flat list of all uris in the track database.
    Files(Vec<String>),

    /// The full playlist snapshot. Replaces any previous snapshot
    /// wholesale; entries are never patched field by field.
    Playlist(Vec<Track>),

    /// The player status. Replaces any previous status wholesale.
    Status(PlayerStatus),
}

/// Wire envelope around every update payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Data")]
    data: serde_json::Value,
}

impl Update {
    /// Decodes a text frame into an update.
    ///
    /// # Errors
    ///
    /// * [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) when
    ///   the frame or its payload is malformed
    /// * [`Unimplemented`](crate::error::ErrorKind::Unimplemented) when the
    ///   envelope carries a kind this client does not recognize; unknown
    ///   kinds allow forward-compatible server additions and are dropped
    ///   with a diagnostic, never treated as fatal
    pub fn from_frame(frame: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(frame)?;

        let update = match envelope.kind.as_str() {
            "CurrentSong" => Self::CurrentSong(serde_json::from_value(envelope.data)?),
            "Files" => Self::Files(serde_json::from_value(envelope.data)?),
            "Playlist" => Self::Playlist(serde_json::from_value(envelope.data)?),
            "Status" => Self::Status(serde_json::from_value(envelope.data)?),
            other => {
                return Err(Error::unimplemented(format!("update kind `{other}`")));
            }
        };

        Ok(update)
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::CurrentSong(_) => Kind::CurrentSong,
            Self::Files(_) => Kind::Files,
            Self::Playlist(_) => Kind::Playlist,
            Self::Status(_) => Kind::Status,
        }
    }
}

/// One playlist or database entry.
///
/// Created wholesale from each snapshot; the `Id` is the stable identifier
/// assigned by MPD, the position is implied by the slot in the snapshot.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Track {
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "Id")]
    pub id: u64,

    /// Source uri relative to the database root.
    #[serde(rename = "file")]
    pub file: String,

    #[serde(rename = "Title", default)]
    pub title: Option<String>,

    #[serde(rename = "Album", default)]
    pub album: Option<String>,

    #[serde(rename = "Artist", default)]
    pub artist: Option<String>,

    /// Duration in whole seconds.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "Time", default)]
    pub time: Option<u64>,
}

impl Track {
    /// The title, or the file name when the tag is missing.
    #[must_use]
    pub fn title_or_file(&self) -> &str {
        match &self.title {
            Some(title) => title,
            None => self.file.rsplit('/').next().unwrap_or(&self.file),
        }
    }
}

/// Transport state of the player.
#[derive(Copy, Clone, Debug, Default, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Play,
    Pause,
    #[default]
    Stop,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Play => write!(f, "play"),
            Self::Pause => write!(f, "pause"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// Elapsed and total time of the current track, in seconds.
///
/// Comes over the wire as `"elapsed:total"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimePair {
    pub elapsed: u64,
    pub total: u64,
}

impl TimePair {
    /// Seconds remaining, saturating at zero.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.elapsed)
    }
}

impl FromStr for TimePair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (elapsed, total) = s
            .split_once(':')
            .ok_or_else(|| Error::invalid_argument(format!("time pair `{s}` missing separator")))?;

        let elapsed = elapsed
            .parse()
            .map_err(|e| Error::invalid_argument(format!("elapsed time: {e}")))?;
        let total = total
            .parse()
            .map_err(|e| Error::invalid_argument(format!("total time: {e}")))?;

        Ok(Self { elapsed, total })
    }
}

/// Player status as last reported by the daemon.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PlayerStatus {
    /// Output volume, 0-100; `-1` when MPD has no output.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "volume")]
    pub volume: i8,

    #[serde(rename = "random", deserialize_with = "flag")]
    pub random: bool,

    #[serde(rename = "repeat", deserialize_with = "flag")]
    pub repeat: bool,

    #[serde(rename = "state")]
    pub state: PlaybackState,

    /// Id of the current song, absent when the playlist is empty.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "songid", default)]
    pub song_id: Option<u64>,

    /// Elapsed and total time, absent when stopped.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "time", default)]
    pub time: Option<TimePair>,
}

/// Decodes MPD's `"0"`/`"1"` flag encoding.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "flag should be `0` or `1`, got `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decodes_status_from_attribute_strings() {
        let frame = r#"{
            "Type": "Status",
            "Data": {
                "volume": "80",
                "random": "0",
                "repeat": "1",
                "state": "play",
                "songid": "12",
                "time": "63:215"
            }
        }"#;

        let Update::Status(status) = Update::from_frame(frame).unwrap() else {
            panic!("expected status update");
        };
        assert_eq!(status.volume, 80);
        assert!(!status.random);
        assert!(status.repeat);
        assert_eq!(status.state, PlaybackState::Play);
        assert_eq!(status.song_id, Some(12));
        assert_eq!(
            status.time,
            Some(TimePair {
                elapsed: 63,
                total: 215
            })
        );
        assert_eq!(status.time.unwrap().remaining(), 152);
    }

    #[test]
    fn stopped_status_has_no_time() {
        let frame = r#"{
            "Type": "Status",
            "Data": {"volume": "-1", "random": "0", "repeat": "0", "state": "stop"}
        }"#;

        let Update::Status(status) = Update::from_frame(frame).unwrap() else {
            panic!("expected status update");
        };
        assert_eq!(status.volume, -1);
        assert_eq!(status.state, PlaybackState::Stop);
        assert_eq!(status.song_id, None);
        assert_eq!(status.time, None);
    }

    #[test]
    fn decodes_playlist_tracks() {
        let frame = r#"{
            "Type": "Playlist",
            "Data": [
                {"Id": "3", "file": "a/b/one.flac", "Title": "One", "Time": "181"},
                {"Id": "4", "file": "a/two.flac"}
            ]
        }"#;

        let Update::Playlist(tracks) = Update::from_frame(frame).unwrap() else {
            panic!("expected playlist update");
        };
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 3);
        assert_eq!(tracks[0].title_or_file(), "One");
        assert_eq!(tracks[0].time, Some(181));
        assert_eq!(tracks[1].title_or_file(), "two.flac");
        assert_eq!(tracks[1].album, None);
    }

    #[test]
    fn decodes_file_lists() {
        let frame = r#"{"Type": "Files", "Data": ["a/one.flac", "b/two.flac"]}"#;
        let update = Update::from_frame(frame).unwrap();
        assert_eq!(update.kind(), Kind::Files);
        assert_eq!(
            update,
            Update::Files(vec!["a/one.flac".to_owned(), "b/two.flac".to_owned()])
        );
    }

    #[test]
    fn unknown_kind_is_unimplemented() {
        let frame = r#"{"Type": "Outputs", "Data": []}"#;
        let e = Update::from_frame(frame).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Unimplemented);
    }

    #[test]
    fn malformed_frames_are_invalid() {
        for frame in ["not json", r#"{"Data": []}"#, r#"{"Type": "Files", "Data": 1}"#] {
            let e = Update::from_frame(frame).unwrap_err();
            assert_eq!(e.kind, ErrorKind::InvalidArgument, "frame: {frame}");
        }
    }

    #[test]
    fn rejects_out_of_range_flags() {
        let frame = r#"{
            "Type": "Status",
            "Data": {"volume": "50", "random": "2", "repeat": "0", "state": "play"}
        }"#;
        assert!(Update::from_frame(frame).is_err());
    }
}

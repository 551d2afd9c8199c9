//! Wire types for the daemon protocol.
//!
//! The daemon speaks UTF-8 JSON text frames over the websocket:
//! * inbound: an envelope `{"Type": <kind>, "Data": <payload>}`, decoded
//!   into an [`Update`]
//! * outbound: a self-describing record `{"Cmd": <name>, ...}`, encoded
//!   from a [`Command`]

pub mod command;
pub mod update;

pub use command::Command;
pub use update::{Kind, PlaybackState, PlayerStatus, TimePair, Track, Update};

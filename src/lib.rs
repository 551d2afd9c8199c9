//! Synchronization core for a websocket MPD remote control client.
//!
//! Keeps three live views (track database, playlist, player transport) in
//! sync with an authoritative daemon over a reconnecting websocket:
//! * [`transport`] - persistent connection with command queuing
//! * [`dispatcher`] - typed fan-out of decoded server updates
//! * [`reconciler`] - ordered-list reconciliation for drag and drop
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod library;
pub mod player;
pub mod protocol;
pub mod reconciler;
pub mod selection;
pub mod store;
pub mod timer;
pub mod transport;

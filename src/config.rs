use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::error::Result;

/// Explicit configuration for one client instance.
///
/// Everything that used to be ambient state (socket address, timer periods,
/// cache location) lives here and is passed by reference to the components
/// that need it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Host (and optional port) of the daemon serving the websocket.
    pub host: String,

    /// Whether the hosting context is secure; selects `wss` over `ws`.
    pub secure: bool,

    /// Delay between a connection loss and the single reconnection attempt.
    pub reconnect_delay: Duration,

    /// Quiet period after a status update before re-requesting status.
    pub status_poll: Duration,

    /// Quiet period used to coalesce rapid volume and seek changes.
    pub input_debounce: Duration,

    /// Snapshot cache file; `None` disables persistence.
    pub cache_path: Option<PathBuf>,
}

impl Config {
    /// Default reconnection delay. A fixed delay, not a backoff: this is a
    /// long-lived session that reconnects indefinitely.
    pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

    /// Default status re-poll cadence.
    pub const STATUS_POLL: Duration = Duration::from_secs(1);

    /// Default coalescing period for rapid slider input.
    pub const INPUT_DEBOUNCE: Duration = Duration::from_millis(100);

    #[must_use]
    pub fn for_host(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
            reconnect_delay: Self::RECONNECT_DELAY,
            status_poll: Self::STATUS_POLL,
            input_debounce: Self::INPUT_DEBOUNCE,
            cache_path: None,
        }
    }

    /// The websocket endpoint derived from the host and security scheme.
    pub fn ws_url(&self) -> Result<Url> {
        let scheme = if self.secure { "wss" } else { "ws" };
        let url = Url::parse(&format!("{scheme}://{}/ws", self.host))?;
        Ok(url)
    }
}

//! Session Controller: connect/disconnect lifecycle and on-connect priming
//! (§2 component table, §4.1).
//!
//! Deliberately tiny: the actual socket lifecycle lives in
//! [`crate::transport::Transport`] and the actual state mutation lives in
//! [`crate::store::Store`]. This module is just the handful of commands
//! that must be (re-)sent whenever a connection opens, kept separate so the
//! engine's main loop reads as "transport connects, session primes it,
//! store starts filling in" rather than burying the priming commands
//! inline.

use crate::model::command::Command;

/// Commands to send immediately after every successful `connect()` *and*
/// every automatic reconnect (§4.1: "On each open: invoke the connect hook,
/// which re-sends `list_servers`").
pub fn on_connect_commands() -> Vec<Command> {
    vec![Command::ListServers]
}

//! Client State Engine for Concord, a self-hostable chat platform.
//!
//! The engine owns one reconnecting WebSocket, multiplexes the ~80 outbound
//! commands and ~70 inbound events the gateway protocol defines, keeps a
//! normalized state mirror up to date as events arrive, and exposes that
//! mirror to a view layer through referentially-stable selectors.
//!
//! Construct a [`Cse`] with [`Cse::new`], call [`Cse::connect`] with the
//! nickname to present to the gateway, then read [`Cse::store`] and
//! [`Cse::ui`] for ever-updating views of server state and of local UI
//! intent state respectively. Send local mutations through the methods on
//! [`Cse`] — some apply an optimistic local mirror ahead of the server's
//! echo (`send_message`, `mark_read`); everything else is fire-and-forget
//! via [`Cse::send_command`].
//!
//! For more detail on any one piece, see the module docs: [`transport`] for
//! the socket and its reconnect behavior, [`store`] for the state mirror and
//! its reducers, [`model`] for the wire protocol itself.

#![warn(missing_docs)]

mod dispatcher;
mod engine;
pub mod error;
mod io;
pub mod model;
pub mod optimistic;
pub mod rest;
mod session;
pub mod store;
mod transport;
pub mod ui;

pub use engine::Cse;
pub use error::{Error, Result};
pub use transport::Transport;

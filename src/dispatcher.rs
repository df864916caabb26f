//! Event Dispatcher (§4.3 component boundary).
//!
//! Frame decoding by `type` discriminator already happened in
//! [`crate::transport::Transport::recv_event`] (malformed frames are logged
//! and dropped there, per §7, before a well-typed [`Event`] ever reaches
//! this module). What is left here is the one-line seam the spec calls out
//! as its own component: route the decoded event to the store's reducers
//! and hand back whatever effects they produced.

use crate::model::event::Event;
use crate::store::reducers::{apply, Effect};
use crate::store::Store;

/// Route one decoded event to `store::reducers::apply`.
pub fn dispatch(store: &Store, event: &Event) -> (Store, Vec<Effect>) {
    apply(store, event)
}

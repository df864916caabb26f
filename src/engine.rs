//! The actor task that owns `Store` and `UiState` exclusively, and the
//! public handle a host application holds to talk to it.
//!
//! This is the concrete shape of §5's "mailbox draining one queue"
//! translation of the single-threaded cooperative model: one task, spawned
//! once by [`Cse::new`], drains an [`Action`] channel and a transport event
//! stream, and publishes snapshots of both `Store` and `UiState` over
//! `watch` channels that many readers can hold without contending with the
//! writer or with each other.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::model::command::Command;
use crate::model::ids::{CategoryId, ChannelId, ChannelKey, MessageId, ServerId};
use crate::model::wire::Attachment;
use crate::optimistic;
use crate::store::reducers::Effect;
use crate::store::{self, Store};
use crate::transport::Transport;
use crate::ui::{FolderStore, UiState};
use crate::{dispatcher, session, Error, Result};

/// Everything that can mutate engine-owned state, whether it originates
/// from a view-layer intent or from [`Cse`]'s public API.
pub enum Action {
    Connect {
        nickname: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
    SendCommand(Command),
    SendMessage {
        server_id: ServerId,
        channel: String,
        content: String,
        attachments: Vec<Attachment>,
        reply: oneshot::Sender<Result<()>>,
    },
    MarkRead {
        server_id: ServerId,
        channel: String,
        message_id: MessageId,
        reply: oneshot::Sender<Result<()>>,
    },
    SetReplyingTo(Option<crate::model::wire::ReplyInfo>),
    /// Any UI Intent Store mutation (§4.5). Kept as a closure rather than a
    /// variant per field so adding a panel-visibility flag doesn't require
    /// growing this enum.
    UiIntent(Box<dyn FnOnce(&mut UiState) + Send>),
    /// Internal: a typing-indicator expiry timer fired (§5 "Cancellation").
    ExpireTyping {
        key: ChannelKey,
        nickname: String,
        generation: u64,
    },
}

/// Handle a host application holds. Cloning it is cheap (an `mpsc::Sender`
/// clone); every clone talks to the same engine task.
#[derive(Clone)]
pub struct Cse {
    actions: mpsc::Sender<Action>,
    store: watch::Receiver<Arc<Store>>,
    ui: watch::Receiver<Arc<UiState>>,
}

impl Cse {
    /// Spawn the engine task and return a handle to it. Does not connect —
    /// call [`Cse::connect`] explicitly (§4.1: `connect` is an idempotent,
    /// separately-invoked operation, not something that happens at
    /// construction).
    ///
    /// REST calls (attachment upload, profile lookup, emoji listing) are
    /// not routed through the engine: construct a [`crate::rest::HttpRestClient`]
    /// separately and call it directly, then hand its result to
    /// [`Cse::send_message`] — the REST collaborator is a sibling the host
    /// application drives, not a dependency of this actor (§6.4).
    pub fn new(base_url: impl Into<String>, folder_store: impl FolderStore + 'static) -> Self {
        let (actions_tx, actions_rx) = mpsc::channel(256);
        let mut initial_ui = UiState::default();
        initial_ui.server_folders = folder_store.load();

        let (store_tx, store_rx) = watch::channel(Arc::new(Store::default()));
        let (ui_tx, ui_rx) = watch::channel(Arc::new(initial_ui));

        tokio::spawn(run(
            base_url.into(),
            Box::new(folder_store),
            actions_rx,
            actions_tx.clone(),
            store_tx,
            ui_tx,
        ));

        Cse {
            actions: actions_tx,
            store: store_rx,
            ui: ui_rx,
        }
    }

    /// A live, ever-updating view of the store. Calling `.borrow()` on it
    /// gets the current `Arc<Store>`; `.changed().await` wakes on every
    /// update (§4.6 selector layer).
    pub fn store(&self) -> watch::Receiver<Arc<Store>> {
        self.store.clone()
    }

    /// A live, ever-updating view of UI intent state.
    pub fn ui(&self) -> watch::Receiver<Arc<UiState>> {
        self.ui.clone()
    }

    pub async fn connect(&self, nickname: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.actions
            .send(Action::Connect {
                nickname: nickname.into(),
                reply,
            })
            .await
            .map_err(|_| Error::Protocol("engine task is gone"))?;
        rx.await.map_err(|_| Error::Protocol("engine task is gone"))?
    }

    pub async fn disconnect(&self) {
        let (reply, rx) = oneshot::channel();
        if self.actions.send(Action::Disconnect { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Fire-and-forget: enqueue any of the ~80 commands in §6.2 that has no
    /// dedicated optimistic-layer method.
    pub async fn send_command(&self, command: Command) {
        let _ = self.actions.send(Action::SendCommand(command)).await;
    }

    /// Optimistically mirror a sent message locally, then hand it to the
    /// transport (§4.4). Fails if not currently connected or if no nickname
    /// has been established yet.
    pub async fn send_message(
        &self,
        server_id: ServerId,
        channel: impl Into<String>,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.actions
            .send(Action::SendMessage {
                server_id,
                channel: channel.into(),
                content: content.into(),
                attachments,
                reply,
            })
            .await
            .map_err(|_| Error::Protocol("engine task is gone"))?;
        rx.await.map_err(|_| Error::Protocol("engine task is gone"))?
    }

    /// Optimistically clear the unread count for a channel, then hand the
    /// `mark_read` command to the transport.
    pub async fn mark_read(
        &self,
        server_id: ServerId,
        channel: impl Into<String>,
        message_id: MessageId,
    ) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.actions
            .send(Action::MarkRead {
                server_id,
                channel: channel.into(),
                message_id,
                reply,
            })
            .await
            .map_err(|_| Error::Protocol("engine task is gone"))?;
        rx.await.map_err(|_| Error::Protocol("engine task is gone"))?
    }

    /// Set or clear the message currently being replied to (§3 `replyingTo`).
    pub async fn set_replying_to(&self, reply_info: Option<crate::model::wire::ReplyInfo>) {
        let _ = self.actions.send(Action::SetReplyingTo(reply_info)).await;
    }

    /// Navigate to a server, clearing the active channel (§4.5 rule).
    pub async fn set_active_server(&self, server_id: Option<ServerId>) {
        self.ui_intent(move |ui| ui.set_active_server(server_id)).await;
    }

    /// Navigate to a channel within the currently active server.
    pub async fn set_active_channel(&self, channel_id: Option<ChannelId>) {
        self.ui_intent(move |ui| ui.active_channel = channel_id).await;
    }

    /// Open or close the thread panel for a given thread (§4.5 rule).
    pub async fn set_active_thread_id(&self, thread_id: Option<ChannelId>) {
        self.ui_intent(move |ui| ui.set_active_thread_id(thread_id)).await;
    }

    /// Collapse or expand one category in the channel list.
    pub async fn set_collapsed_category(&self, category_id: CategoryId, collapsed: bool) {
        self.ui_intent(move |ui| {
            ui.collapsed_categories.insert(category_id, collapsed);
        })
        .await;
    }

    /// Add a server folder and persist it (§6.5).
    pub async fn add_server_folder(&self, folder: crate::model::wire::Folder) {
        self.ui_intent(move |ui| ui.server_folders.push(folder)).await;
    }

    /// Remove a server folder by id and persist the change.
    pub async fn remove_server_folder(&self, folder_id: String) {
        self.ui_intent(move |ui| ui.server_folders.retain(|f| f.id != folder_id))
            .await;
    }

    /// Apply an arbitrary UI Intent Store mutation (§4.5).
    pub async fn ui_intent(&self, mutate: impl FnOnce(&mut UiState) + Send + 'static) {
        let _ = self.actions.send(Action::UiIntent(Box::new(mutate))).await;
    }
}

async fn run(
    base_url: String,
    folder_store: Box<dyn FolderStore>,
    mut actions: mpsc::Receiver<Action>,
    actions_tx: mpsc::Sender<Action>,
    store_tx: watch::Sender<Arc<Store>>,
    ui_tx: watch::Sender<Arc<UiState>>,
) {
    let mut store = Store::default();
    let mut ui = UiState::default();
    ui.server_folders = folder_store.load();
    let _ = ui_tx.send(Arc::new(ui.clone()));

    let mut transport = Transport::new(base_url);

    loop {
        tokio::select! {
            action = actions.recv() => {
                match action {
                    Some(action) => {
                        handle_action(
                            action,
                            &mut store,
                            &mut ui,
                            &mut transport,
                            &*folder_store,
                            &store_tx,
                            &ui_tx,
                        )
                        .await;
                    }
                    None => break,
                }
            }
            event = transport.recv_event(), if transport.should_poll() => {
                match event {
                    Ok(event) => {
                        // An automatic reconnect re-opened the socket since we
                        // last looked; re-run the same priming commands the
                        // initial `connect()` sends, per §4.1's "on each
                        // open" (not just the first).
                        if transport.take_reconnected() {
                            for command in session::on_connect_commands() {
                                let _ = transport.send(&command).await;
                            }
                        }
                        let (next, effects) = dispatcher::dispatch(&store, &event);
                        store = next;
                        let _ = store_tx.send(Arc::new(store.clone()));
                        apply_effects(effects, &mut transport, &actions_tx).await;
                    }
                    Err(err) => {
                        debug!("transport stopped polling: {err}");
                    }
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_action(
    action: Action,
    store: &mut Store,
    ui: &mut UiState,
    transport: &mut Transport,
    folder_store: &dyn FolderStore,
    store_tx: &watch::Sender<Arc<Store>>,
    ui_tx: &watch::Sender<Arc<UiState>>,
) {
    match action {
        Action::Connect { nickname, reply } => {
            let result = transport.connect(&nickname).await;
            if result.is_ok() {
                store.connected = true;
                store.nickname = Some(nickname);
                store.session_epoch += 1;
                let _ = store_tx.send(Arc::new(store.clone()));
                for command in session::on_connect_commands() {
                    let _ = transport.send(&command).await;
                }
            }
            let _ = reply.send(result);
        }

        Action::Disconnect { reply } => {
            transport.disconnect().await;
            store.reset_on_disconnect();
            let _ = store_tx.send(Arc::new(store.clone()));
            let _ = reply.send(());
        }

        Action::SendCommand(command) => {
            let _ = transport.send(&command).await;
        }

        Action::SendMessage {
            server_id,
            channel,
            content,
            attachments,
            reply,
        } => {
            let result = optimistic::send_message(store, server_id, channel, content, attachments);
            match result {
                Ok((message, key, command)) => {
                    let mut list = (*store
                        .messages
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(store::empty_messages))
                    .clone();
                    list.push(message);
                    store.messages.insert(key, std::sync::Arc::new(list));
                    store.replying_to = None;
                    let _ = store_tx.send(Arc::new(store.clone()));
                    let _ = transport.send(&command).await;
                    let _ = reply.send(Ok(()));
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            }
        }

        Action::MarkRead {
            server_id,
            channel,
            message_id,
            reply,
        } => {
            let result = optimistic::mark_read(store, server_id, channel, message_id);
            match result {
                Ok((key, command)) => {
                    store.unread_counts.remove(&key);
                    let _ = store_tx.send(Arc::new(store.clone()));
                    let _ = transport.send(&command).await;
                    let _ = reply.send(Ok(()));
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            }
        }

        Action::SetReplyingTo(reply_info) => {
            store.replying_to = reply_info;
            let _ = store_tx.send(Arc::new(store.clone()));
        }

        Action::UiIntent(mutate) => {
            mutate(ui);
            folder_store.save(&ui.server_folders);
            let _ = ui_tx.send(Arc::new(ui.clone()));
        }

        Action::ExpireTyping {
            key,
            nickname,
            generation,
        } => {
            *store = crate::store::reducers::expire_typing(store, &key, &nickname, generation);
            let _ = store_tx.send(Arc::new(store.clone()));
        }
    }
}

async fn apply_effects(
    effects: Vec<Effect>,
    transport: &mut Transport,
    actions_tx: &mpsc::Sender<Action>,
) {
    for effect in effects {
        match effect {
            Effect::Send(command) => {
                let _ = transport.send(&command).await;
            }
            Effect::ScheduleTypingExpiry {
                key,
                nickname,
                generation,
            } => {
                let tx = actions_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(8)).await;
                    let _ = tx
                        .send(Action::ExpireTyping {
                            key,
                            nickname,
                            generation,
                        })
                        .await;
                });
            }
        }
    }
}

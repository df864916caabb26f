//! Optimistic local mutations applied ahead of server acknowledgement (§4.4).
//!
//! Only `sendMessage` and `markRead` get a local mirror; the rest of this
//! layer's contract is "rely on the echo" (§4.4 rationale: edits, deletes,
//! and reaction toggles are rare enough relative to sends that waiting out
//! the round trip is an acceptable user experience).

use uuid::Uuid;

use crate::model::command::Command;
use crate::model::ids::{ChannelKey, MessageId, ServerId};
use crate::model::wire::{Attachment, Message};
use crate::store::Store;
use crate::{Error, Result};

/// Build the local message and outbound command for an optimistic send.
///
/// Returns `(message, key, command)`: the caller inserts `message` at
/// `store.messages[key]` and clears `store.replying_to`, then hands
/// `command` to the transport. Kept as a pure function (rather than taking
/// `&mut Store` itself) so it is trivially unit-testable without spinning up
/// the engine task.
pub fn send_message(
    store: &Store,
    server_id: ServerId,
    channel: String,
    content: String,
    attachments: Vec<Attachment>,
) -> Result<(Message, ChannelKey, Command)> {
    if !store.connected {
        return Err(Error::Precondition("sendMessage while disconnected"));
    }
    let nickname = store
        .nickname
        .clone()
        .ok_or(Error::Precondition("sendMessage before nickname is known"))?;

    let id = MessageId::from(Uuid::new_v4().to_string());
    let key = ChannelKey::new(&server_id, &channel);
    let reply_to = store.replying_to.clone();

    let message = Message {
        id: id.clone(),
        author: nickname,
        content: content.clone(),
        timestamp: chrono::Utc::now(),
        edited_at: None,
        reply_to: reply_to.clone(),
        reactions: Vec::new(),
        attachments: attachments.clone(),
        embeds: Vec::new(),
    };

    let command = Command::SendMessage {
        server_id,
        channel,
        content,
        reply_to: reply_to.map(|r| r.id),
        attachment_ids: Some(attachments.into_iter().map(|a| a.id.to_string()).collect()),
    };

    Ok((message, key, command))
}

/// Build the outbound command and the key to optimistically clear for
/// `markRead`.
pub fn mark_read(
    store: &Store,
    server_id: ServerId,
    channel: String,
    message_id: MessageId,
) -> Result<(ChannelKey, Command)> {
    if !store.connected {
        return Err(Error::Precondition("markRead while disconnected"));
    }
    let key = ChannelKey::new(&server_id, &channel);
    let command = Command::MarkRead {
        server_id,
        channel,
        message_id,
    };
    Ok((key, command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimistic_send_echoes_locally() {
        let mut store = Store::default();
        store.connected = true;
        store.nickname = Some("alice".into());

        let (message, key, _command) = send_message(
            &store,
            ServerId::from("srv1"),
            "#g".into(),
            "hi".into(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(message.author, "alice");
        assert_eq!(message.content, "hi");
        assert_eq!(key.as_str(), "srv1:#g");
        assert!(message.reply_to.is_none());
    }

    #[test]
    fn send_message_rejects_when_disconnected() {
        let store = Store::default();
        let result = send_message(
            &store,
            ServerId::from("srv1"),
            "#g".into(),
            "hi".into(),
            Vec::new(),
        );
        assert!(result.is_err());
    }
}

//! Opaque string identifiers.
//!
//! Concord identifies every resource with a server-generated UUID rather
//! than a Twitter-Snowflake integer, so identifiers here wrap a `String`
//! instead of a `u64`. They are still cheap to compare and hash, and they
//! round-trip through the wire untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! concord_id {
    ($(#[$attr:meta] $name:ident;)*) => {
        $(
            #[$attr]
            #[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
            #[derive(Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub String);

            impl $name {
                /// Borrow the identifier as a plain string slice.
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    $name(s)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    $name(s.to_owned())
                }
            }
        )*
    }
}

concord_id! {
    /// Identifies a server (what Discord calls a guild).
    ServerId;
    /// Identifies a channel within a server, or a thread.
    ChannelId;
    /// Identifies a category grouping of channels.
    CategoryId;
    /// Identifies a role within a server.
    RoleId;
    /// Identifies a single message.
    MessageId;
    /// Identifies a user account.
    UserId;
    /// Identifies an uploaded attachment.
    AttachmentId;
    /// Identifies an invite code's backing record.
    InviteId;
    /// Identifies a scheduled server event.
    EventId;
    /// Identifies an automod rule.
    AutomodRuleId;
    /// Identifies a server template.
    TemplateId;
    /// Identifies a bookmark.
    BookmarkId;
    /// Identifies an audit log entry.
    AuditEntryId;
    /// Identifies a forum tag.
    ForumTagId;
}

/// The composite key used to index all channel-scoped maps: `server_id ":"
/// channel_name`, built with an exact single-colon join (§3).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ChannelKey(String);

impl ChannelKey {
    /// Build the compound key for a (server, channel) pair.
    ///
    /// `channelKey(s, c) = s + ":" + c` exactly; this is the one and only
    /// place that concatenation happens so the spelling can never drift.
    pub fn new(server_id: &ServerId, channel_name: &str) -> Self {
        let mut key = String::with_capacity(server_id.as_str().len() + 1 + channel_name.len());
        key.push_str(server_id.as_str());
        key.push(':');
        key.push_str(channel_name);
        ChannelKey(key)
    }

    /// Build a key directly from a raw `server_id:channel` string, e.g. one
    /// already received from the wire. Does not validate the colon is
    /// present; callers that need the split use [`ChannelKey::split`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        ChannelKey(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(server_id, channel_name)`, if this key was built
    /// from a well-formed pair. Splits on the first colon, since channel
    /// names cannot themselves contain one but a UUID server id never does
    /// either.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once(':')
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_key_is_exact_concatenation() {
        let server = ServerId::from("srv1");
        let key = ChannelKey::new(&server, "general");
        assert_eq!(key.as_str(), "srv1:general");
    }

    #[test]
    fn channel_key_round_trips() {
        let server = ServerId::from("srv1");
        let key = ChannelKey::new(&server, "general");
        assert_eq!(key.split(), Some(("srv1", "general")));
    }

    #[test]
    fn channel_key_is_total_and_deterministic() {
        let server = ServerId::from("srv1");
        let a = ChannelKey::new(&server, "general");
        let b = ChannelKey::new(&server, "general");
        assert_eq!(a, b);
    }
}

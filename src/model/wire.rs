//! Wire-shape entities for every resource the store mirrors (§3).
//!
//! Sibling to `frozen`/`live` in the teacher crate: these structs are the
//! thing a reducer upserts into a [`crate::store::Store`] map, not the thing
//! a reducer matches on (that's [`crate::model::event::Event`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ids::{
    AttachmentId, AuditEntryId, AutomodRuleId, BookmarkId, CategoryId, ChannelId, EventId,
    ForumTagId, InviteId, MessageId, RoleId, ServerId, TemplateId, UserId,
};
use crate::model::permissions::{ChannelType, Permissions};

/// A server (what Discord calls a guild).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Server {
    /// Identifier.
    pub id: ServerId,
    /// Display name.
    pub name: String,
    /// URL of the icon image, if any.
    pub icon: Option<String>,
    /// Number of members.
    pub member_count: u64,
    /// The role the viewing client holds, if any has been resolved yet.
    pub viewer_role: Option<RoleId>,
}

/// A channel within a server, or a thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    /// Identifier.
    pub id: ChannelId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Channel topic text, if any.
    pub topic: Option<String>,
    /// Which category this applies to, if any.
    pub category_id: Option<CategoryId>,
    /// Sort position, lower sorts first.
    pub position: i64,
    /// Whether the channel is private.
    pub is_private: bool,
    /// Text, voice, forum, and so on.
    pub channel_type: ChannelType,
    /// The message this thread was spun off from, if this channel is a thread.
    pub thread_parent_message_id: Option<MessageId>,
    /// Whether the channel (or thread) is archived.
    pub archived: bool,
    /// Minimum delay between messages, in seconds.
    pub slowmode_seconds: u32,
    /// Whether the channel is marked not-safe-for-work.
    pub is_nsfw: bool,
    /// Whether the channel is an announcement channel.
    pub is_announcement: bool,
}

/// A grouping of channels within a server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    /// Identifier.
    pub id: CategoryId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Sort position, lower sorts first.
    pub position: i64,
}

/// A role within a server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Role {
    /// Identifier.
    pub id: RoleId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Display color, if any.
    pub color: Option<u32>,
    /// URL of the icon image, if any.
    pub icon: Option<String>,
    /// Sort position, lower sorts first.
    pub position: i64,
    /// Permission bitmask granted by this role.
    pub permissions: Permissions,
    /// Whether this is the server's implicit `@everyone`-equivalent role.
    pub is_default: bool,
}

/// A channel-scoped view of a member: just enough to render a member list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    /// Nickname of the member.
    pub nickname: String,
    /// URL of the avatar image, if any.
    pub avatar_url: Option<String>,
    /// Identifier, if the server includes one for this entry.
    pub user_id: Option<UserId>,
    /// Online status, if known.
    pub status: Option<String>,
    /// Free-text custom status, if any.
    pub custom_status: Option<String>,
    /// Emoji shown alongside the custom status, if any.
    pub status_emoji: Option<String>,
}

/// A single reaction group on a message: one emoji, its reactors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReactionGroup {
    /// Unicode emoji or `:custom_name:` identifier.
    pub emoji: String,
    /// Identifiers of the users who reacted.
    pub user_ids: Vec<UserId>,
    /// Cached length of `user_ids`, kept in sync by [`ReactionGroup::recompute_count`].
    pub count: usize,
}

impl ReactionGroup {
    /// Recomputes `count` from `user_ids.len()`.
    pub fn recompute_count(&mut self) {
        self.count = self.user_ids.len();
    }
}

/// A file or image attached to a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attachment {
    /// Identifier.
    pub id: AttachmentId,
    /// Original filename.
    pub filename: String,
    /// URL where the attachment content can be fetched.
    pub url: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

/// `reply_to`: a lightweight pointer back to the message being replied to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplyInfo {
    /// Identifier of the message being replied to.
    pub id: MessageId,
    /// Nickname of the replied-to message's author.
    pub author: String,
    /// The first 100 characters of the target message's content.
    pub content_preview: String,
}

impl ReplyInfo {
    /// Build a `ReplyInfo` by truncating `content` to its first 100 chars.
    pub fn from_message(id: MessageId, author: impl Into<String>, content: &str) -> Self {
        let content_preview: String = content.chars().take(100).collect();
        ReplyInfo {
            id,
            author: author.into(),
            content_preview,
        }
    }
}

/// A chat message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Identifier.
    pub id: MessageId,
    /// Nickname of the sender.
    pub author: String,
    /// Message body.
    pub content: String,
    /// When this occurred.
    pub timestamp: DateTime<Utc>,
    /// When the message was last edited, if ever.
    pub edited_at: Option<DateTime<Utc>>,
    /// The message being replied to, if any.
    pub reply_to: Option<ReplyInfo>,
    /// Reaction groups on this message, one per distinct emoji.
    pub reactions: Vec<ReactionGroup>,
    /// Files or images attached to this message.
    pub attachments: Vec<Attachment>,
    /// Rich embed payloads attached to the message, opaque to the client.
    pub embeds: Vec<Value>,
}

/// `status` of a [`Presence`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnlineStatus {
    /// Actively online.
    Online,
    /// Connected but away.
    Idle,
    /// Do not disturb.
    Dnd,
    /// Connected but appearing offline.
    Invisible,
    /// Not connected.
    Offline,
}

/// Per-(server, user) presence record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Presence {
    /// Which user this applies to.
    pub user_id: UserId,
    /// Online status.
    pub status: OnlineStatus,
    /// Free-text custom status, if any.
    pub custom_status: Option<String>,
    /// Emoji shown alongside the custom status, if any.
    pub status_emoji: Option<String>,
}

/// A user's public profile, as surfaced by the REST collaborator or a
/// `user_profile` event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identifier.
    pub user_id: UserId,
    /// Account username.
    pub username: String,
    /// URL of the avatar image, if any.
    pub avatar: Option<String>,
    /// Free-text profile bio, if any.
    pub bio: Option<String>,
    /// Free-text pronouns, if any.
    pub pronouns: Option<String>,
    /// URL of the profile banner image, if any.
    pub banner: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A pinned message marker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinnedMessage {
    /// Which message this applies to.
    pub message_id: MessageId,
    /// When the message was pinned.
    pub pinned_at: DateTime<Utc>,
    /// Nickname of whoever pinned it.
    pub pinned_by: String,
}

/// A bookmarked message, with an optional personal note.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bookmark {
    /// Identifier.
    pub id: BookmarkId,
    /// Which message this applies to.
    pub message_id: MessageId,
    /// Personal note attached to the bookmark, if any.
    pub note: Option<String>,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}

/// A thread spun off a parent channel's message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thread {
    /// Identifier.
    pub id: ChannelId,
    /// The channel this thread was spun off from.
    pub parent_channel_id: ChannelId,
    /// Display name.
    pub name: String,
    /// The message this thread was spun off from.
    pub message_id: MessageId,
    /// Whether the thread is private.
    pub is_private: bool,
    /// Whether the thread is archived.
    pub archived: bool,
}

/// A forum channel's tag definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForumTag {
    /// Identifier.
    pub id: ForumTagId,
    /// Display name.
    pub name: String,
    /// Emoji shown alongside the tag, if any.
    pub emoji: Option<String>,
}

/// A server-level ban record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ban {
    /// Which user this applies to.
    pub user_id: UserId,
    /// Nickname of the banned user, captured at ban time.
    pub nickname: String,
    /// Free-text ban reason, if any.
    pub reason: Option<String>,
}

/// One entry in a server's moderation audit log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Identifier.
    pub id: AuditEntryId,
    /// What kind of action this entry records.
    pub action_type: String,
    /// Nickname of whoever performed the action.
    pub actor: String,
    /// Description of what the action targeted.
    pub target: Option<String>,
    /// Free-text reason, if any.
    pub reason: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// A configured automod rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutomodRule {
    /// Identifier.
    pub id: AutomodRuleId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Whether the rule is active.
    pub enabled: bool,
    /// Opaque trigger configuration, server-defined.
    pub trigger: Value,
    /// Opaque action configuration, server-defined.
    pub actions: Value,
}

/// A server invite.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invite {
    /// Identifier.
    pub id: InviteId,
    /// The invite code, as used in an invite URL.
    pub code: String,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Nickname of whoever created the invite.
    pub created_by: String,
    /// Number of times the invite has been redeemed.
    pub uses: u64,
    /// Maximum number of redemptions allowed, if bounded.
    pub max_uses: Option<u64>,
    /// When the invite stops working, if it expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A scheduled server event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Identifier.
    pub id: EventId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// When the event starts.
    pub starts_at: DateTime<Utc>,
    /// When the event ends, if it has a defined end.
    pub ends_at: Option<DateTime<Utc>>,
    /// Scheduled, active, completed, or cancelled, as a server-defined string.
    pub status: String,
}

/// A server's community/discovery metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommunitySettings {
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Public description shown in the discovery listing, if any.
    pub description: Option<String>,
    /// Discovery category, if any.
    pub category: Option<String>,
    /// Whether the server is listed in discovery.
    pub discoverable: bool,
    /// Whether the community guidelines have been accepted.
    pub rules_accepted: bool,
}

/// A reusable server template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    /// Identifier.
    pub id: TemplateId,
    /// Which server this applies to.
    pub server_id: ServerId,
    /// Display name.
    pub name: String,
    /// Human-readable description, if any.
    pub description: Option<String>,
}

/// A client-local, UI-only grouping of servers into a folder.
///
/// The sole persisted entity (§6.5) — everything else in this module lives
/// only in memory, rebuilt from server events after reconnect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Folder {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifiers of the servers grouped into this folder, in order.
    pub server_ids: Vec<ServerId>,
    /// Whether the folder is collapsed in the UI.
    pub collapsed: bool,
}

/// Per-channel notification preference, upserted by `notification_settings`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Which server this applies to.
    pub server_id: ServerId,
    /// All messages, mentions only, or nothing, as a server-defined string.
    pub level: String,
    /// Whether `@everyone`/`@here` mentions are suppressed.
    pub suppress_everyone: bool,
    /// Whether role mentions are suppressed.
    pub suppress_roles: bool,
    /// Whether the channel is muted.
    pub muted: bool,
    /// When a temporary mute lifts, if set.
    pub mute_until: Option<DateTime<Utc>>,
}

/// Result of the last `search_messages` round trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchState {
    /// Search query text.
    pub query: String,
    /// The matching messages, or `None` before the first search completes.
    pub results: Option<Vec<Message>>,
    /// Total number of matches, which may exceed the returned page.
    pub total_count: u64,
}

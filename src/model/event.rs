//! Server-to-client event catalog (§6.3).
//!
//! Mirrors [`crate::model::command::Command`] in shape: one JSON object per
//! frame, tagged by `type`. Unlike commands, events must tolerate
//! discriminators this build doesn't know about yet — newer servers will
//! send newer event kinds, and §6.3 requires they be ignored, not treated as
//! a parse error. The trailing `#[serde(other)] Unknown` variant is what
//! makes that forward-compatible: deserialization falls back to it instead
//! of failing, and [`crate::dispatcher`] drops it silently.

use serde::{Deserialize, Serialize};

use crate::model::ids::{
    AttachmentId, AutomodRuleId, BookmarkId, CategoryId, ChannelId, EventId, ForumTagId, InviteId,
    MessageId, RoleId, ServerId, TemplateId, UserId,
};
use crate::model::wire::{
    AuditEntry, AutomodRule, Ban, Bookmark, Category, Channel, CommunitySettings, ForumTag,
    Invite, Message, NotificationSettings, PinnedMessage, Role, ScheduledEvent, Server, Template,
    Thread, UserProfile,
};

/// Shape carried by `presence_update`/inside `presence_list`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// Which user this applies to.
    pub user_id: UserId,
    /// Online status.
    pub status: String,
    /// Free-text custom status, if any.
    pub custom_status: Option<String>,
    /// Emoji shown alongside the custom status, if any.
    pub status_emoji: Option<String>,
}

/// One entry in a `names` or `join` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberEntry {
    /// Nickname of the member.
    pub nickname: String,
    /// URL of the avatar image, if any.
    pub avatar_url: Option<String>,
    /// Identifier, if the server includes one for this entry.
    pub user_id: Option<UserId>,
}

/// One entry in a `channel_reorder` payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelReorderEntry {
    /// Identifier.
    pub id: ChannelId,
    /// Which category this applies to.
    pub category_id: Option<CategoryId>,
    /// Sort position, lower sorts first.
    pub position: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // --- Messages ---
    /// `message`: a new message was posted.
    Message {
        /// Which server this applies to.
        server_id: Option<ServerId>,
        /// Description of what the action targeted.
        target: String,
        /// Nickname of the sender.
        from: String,
        /// Identifier.
        id: MessageId,
        /// Message body.
        content: String,
        /// When this occurred.
        timestamp: chrono::DateTime<chrono::Utc>,
        /// URL of the avatar image, if any.
        avatar_url: Option<String>,
        /// Identifier of the message being replied to, if any.
        reply_to_id: Option<MessageId>,
        /// Identifiers of attachments already uploaded via the REST collaborator.
        attachment_ids: Option<Vec<AttachmentId>>,
    },
    /// `message_edit`: Message Edit.
    MessageEdit {
        /// Which message this applies to.
        message_id: MessageId,
        /// Message body.
        content: String,
        /// When the message was last edited, if ever.
        edited_at: chrono::DateTime<chrono::Utc>,
    },
    /// `message_delete`: Message Delete.
    MessageDelete {
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `message_embed`: Message Embed.
    MessageEmbed {
        /// Which message this applies to.
        message_id: MessageId,
        /// Rich embed payloads attached to the message, opaque to the client.
        embeds: Vec<serde_json::Value>,
    },
    /// `bulk_message_delete`: Bulk Message Delete.
    BulkMessageDelete {
        /// Identifiers of the affected messages.
        message_ids: Vec<MessageId>,
    },

    // --- Reactions ---
    /// `reaction_add`: Reaction Add.
    ReactionAdd {
        /// Which message this applies to.
        message_id: MessageId,
        /// Unicode emoji or `:custom_name:` identifier.
        emoji: String,
        /// Which user this applies to.
        user_id: UserId,
    },
    /// `reaction_remove`: Reaction Remove.
    ReactionRemove {
        /// Which message this applies to.
        message_id: MessageId,
        /// Unicode emoji or `:custom_name:` identifier.
        emoji: String,
        /// Which user this applies to.
        user_id: UserId,
    },

    // --- Presence & typing ---
    /// `typing_start`: Typing Start.
    TypingStart {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The nickname to use, or `None` to clear it.
        nickname: String,
    },
    /// `presence_update`: Presence Update.
    PresenceUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        #[serde(flatten)]
        /// The presence entry.
        presence: PresenceEntry,
    },
    /// `presence_list`: Presence List.
    PresenceList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The presence entries in this payload.
        presences: Vec<PresenceEntry>,
    },

    // --- Membership ---
    /// `join`: Join.
    Join {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        #[serde(flatten)]
        /// The member entry.
        member: MemberEntry,
    },
    /// `part`: Part.
    Part {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The nickname to use, or `None` to clear it.
        nickname: String,
    },
    /// `quit`: Quit.
    Quit {
        /// The nickname to use, or `None` to clear it.
        nickname: String,
    },
    /// `names`: Names.
    Names {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The member entries in this payload.
        members: Vec<MemberEntry>,
    },
    /// `nick_change`: Nick Change.
    NickChange {
        /// The nickname before the change.
        old_nickname: String,
        /// The nickname after the change.
        new_nickname: String,
    },

    // --- Channel structure ---
    /// `topic`: Topic.
    Topic {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Channel topic text.
        topic: String,
    },
    /// `topic_change`: Topic Change.
    TopicChange {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Channel topic text.
        topic: String,
    },
    /// `channel_list`: Channel List.
    ChannelList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channels affected by this change.
        channels: Vec<Channel>,
    },
    /// `channel_reorder`: Channel Reorder.
    ChannelReorder {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channels affected by this change.
        channels: Vec<ChannelReorderEntry>,
    },
    /// `slow_mode_update`: Slow Mode Update.
    SlowModeUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Duration in seconds.
        seconds: u32,
    },
    /// `nsfw_update`: Nsfw Update.
    NsfwUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Whether the channel is marked not-safe-for-work.
        is_nsfw: bool,
    },

    // --- Categories & roles ---
    /// `category_list`: Category List.
    CategoryList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The categories in this payload.
        categories: Vec<Category>,
    },
    /// `category_update`: Category Update.
    CategoryUpdate {
        /// Discovery category.
        category: Category,
    },
    /// `category_delete`: Category Delete.
    CategoryDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which category this applies to.
        category_id: CategoryId,
    },
    /// `role_list`: Role List.
    RoleList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The roles in this payload.
        roles: Vec<Role>,
    },
    /// `role_update`: Role Update.
    RoleUpdate {
        /// The role involved.
        role: Role,
    },
    /// `role_delete`: Role Delete.
    RoleDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which role this applies to.
        role_id: RoleId,
    },
    /// `member_role_update`: Member Role Update.
    MemberRoleUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// Identifiers of the roles now assigned.
        role_ids: Vec<RoleId>,
    },

    // --- History ---
    /// `history`: History.
    History {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Sent by the server in descending time order; the reducer
        /// reverses before prepending (§4.3).
        messages: Vec<Message>,
        /// Whether more history is available before the oldest message returned.
        has_more: bool,
    },

    // --- Session-wide ---
    /// `server_list`: Server List.
    ServerList {
        /// The servers in this payload.
        servers: Vec<Server>,
    },
    /// `unread_counts`: Unread Counts.
    UnreadCounts {
        /// Unread count per compound channel key; a key absent here means zero.
        counts: std::collections::HashMap<String, u64>,
    },
    /// `server_notice`: Server Notice.
    ServerNotice {
        /// Message text.
        message: String,
    },

    // --- Profile & notifications ---
    /// `user_profile`: User Profile.
    UserProfile {
        /// The user profile payload.
        profile: UserProfile,
    },
    /// `server_nickname_update`: Server Nickname Update.
    ServerNicknameUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        /// The nickname to use, or `None` to clear it.
        nickname: String,
    },
    /// `notification_settings`: Notification Settings.
    NotificationSettings {
        /// The settings payload.
        settings: NotificationSettings,
    },

    // --- Search ---
    /// `search_results`: Search Results.
    SearchResults {
        /// Search query text.
        query: String,
        /// The matching messages.
        results: Vec<Message>,
        /// Total number of matches, which may exceed the returned page.
        total_count: u64,
    },

    // --- Pins & threads ---
    /// `message_pin`: Message Pin.
    MessagePin {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The pin record.
        pin: PinnedMessage,
    },
    /// `message_unpin`: Message Unpin.
    MessageUnpin {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `pinned_messages`: Pinned Messages.
    PinnedMessages {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The pin records in this payload.
        pins: Vec<PinnedMessage>,
    },
    /// `thread_create`: Thread Create.
    ThreadCreate {
        /// The thread.
        thread: Thread,
    },
    /// `thread_update`: Thread Update.
    ThreadUpdate {
        /// The thread.
        thread: Thread,
    },
    /// `thread_list`: Thread List.
    ThreadList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The threads in this payload.
        threads: Vec<Thread>,
    },
    /// `forum_tag_list`: Forum Tag List.
    ForumTagList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The forum tags in this payload.
        tags: Vec<ForumTag>,
    },
    /// `forum_tag_update`: Forum Tag Update.
    ForumTagUpdate {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// The forum tag.
        tag: ForumTag,
    },
    /// `forum_tag_delete`: Forum Tag Delete.
    ForumTagDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Which forum tag this applies to.
        tag_id: ForumTagId,
    },

    // --- Bookmarks ---
    /// `bookmark_list`: Bookmark List.
    BookmarkList {
        /// The bookmarks in this payload.
        bookmarks: Vec<Bookmark>,
    },
    /// `bookmark_add`: Bookmark Add.
    BookmarkAdd {
        /// The bookmark.
        bookmark: Bookmark,
    },
    /// `bookmark_remove`: Bookmark Remove.
    BookmarkRemove {
        /// Which bookmark this applies to.
        bookmark_id: BookmarkId,
    },

    // --- Moderation ---
    /// `member_kick`: Member Kick.
    MemberKick {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
    },
    /// `member_ban`: Member Ban.
    MemberBan {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
    },
    /// `member_unban`: Member Unban.
    MemberUnban {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
    },
    /// `member_timeout`: Member Timeout.
    MemberTimeout {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// When the timeout expires, or `None` to lift it immediately.
        timeout_until: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// `audit_log_entries`: Audit Log Entries.
    AuditLogEntries {
        /// Which server this applies to.
        server_id: ServerId,
        /// The audit log entries in this payload.
        entries: Vec<AuditEntry>,
    },
    /// `ban_list`: Ban List.
    BanList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The ban records in this payload.
        bans: Vec<Ban>,
    },
    /// `automod_rule_list`: Automod Rule List.
    AutomodRuleList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The automod rules in this payload.
        rules: Vec<AutomodRule>,
    },
    /// `automod_rule_update`: Automod Rule Update.
    AutomodRuleUpdate {
        /// The rule.
        rule: AutomodRule,
    },
    /// `automod_rule_delete`: Automod Rule Delete.
    AutomodRuleDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which automod rule this applies to.
        rule_id: AutomodRuleId,
    },

    // --- Community ---
    /// `invite_list`: Invite List.
    InviteList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The invites.
        invites: Vec<Invite>,
    },
    /// `invite_create`: Invite Create.
    InviteCreate {
        /// The invite.
        invite: Invite,
    },
    /// `invite_delete`: Invite Delete.
    InviteDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which invite this applies to.
        invite_id: InviteId,
    },
    /// `event_list`: Event List.
    EventList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The events.
        events: Vec<ScheduledEvent>,
    },
    /// `event_update`: Event Update.
    EventUpdate {
        /// The event.
        event: ScheduledEvent,
    },
    /// `event_delete`: Event Delete.
    EventDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which scheduled event this applies to.
        event_id: EventId,
    },
    /// `event_rsvp_list`: Event Rsvp List.
    EventRsvpList {
        /// Which scheduled event this applies to.
        event_id: EventId,
        /// The user ids.
        user_ids: Vec<UserId>,
    },
    /// `server_community`: Server Community.
    ServerCommunity {
        /// The settings payload.
        settings: CommunitySettings,
    },
    /// `discover_servers`: Discover Servers.
    DiscoverServers {
        /// The servers in this payload.
        servers: Vec<CommunitySettings>,
    },
    /// `channel_follow_list`: Channel Follow List.
    ChannelFollowList {
        /// Which channel this applies to.
        channel_id: ChannelId,
        /// The follows.
        follows: Vec<String>,
    },
    /// `channel_follow_create`: Channel Follow Create.
    ChannelFollowCreate {
        /// Which channel this applies to.
        channel_id: ChannelId,
        /// Identifier of the follow relationship.
        follow_id: String,
    },
    /// `channel_follow_delete`: Channel Follow Delete.
    ChannelFollowDelete {
        /// Which channel this applies to.
        channel_id: ChannelId,
        /// Identifier of the follow relationship.
        follow_id: String,
    },
    /// `template_list`: Template List.
    TemplateList {
        /// Which server this applies to.
        server_id: ServerId,
        /// The templates.
        templates: Vec<Template>,
    },
    /// `template_update`: Template Update.
    TemplateUpdate {
        /// The template.
        template: Template,
    },
    /// `template_delete`: Template Delete.
    TemplateDelete {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which template this applies to.
        template_id: TemplateId,
    },

    // --- Errors ---
    /// `error`: Error.
    Error {
        /// Invite code.
        code: String,
        /// Message text.
        message: String,
    },

    /// Any discriminator this build doesn't recognize yet. Per §6.3,
    /// implementations MUST ignore unknown variants rather than treat them
    /// as a decode failure.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_discriminator_does_not_fail_to_parse() {
        let raw = serde_json::json!({ "type": "some_future_event", "whatever": 1 });
        let event: Event = serde_json::from_value(raw).expect("unknown events must still parse");
        assert!(matches!(event, Event::Unknown));
    }

    #[test]
    fn message_round_trips() {
        let raw = serde_json::json!({
            "type": "message",
            "server_id": "srv1",
            "target": "#g",
            "from": "bob",
            "id": "m1",
            "content": "yo",
            "timestamp": "2024-01-01T00:00:00Z",
            "avatar_url": null,
            "reply_to_id": null,
            "attachment_ids": null,
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert!(matches!(event, Event::Message { .. }));
    }
}

//! Client-to-server command catalog (§6.2).
//!
//! Commands are fire-and-forget: the Command Router assigns no request id
//! and expects no correlated reply, only the ordinary event stream. Every
//! variant here is something [`crate::transport::Transport::send`] can
//! serialize onto the wire, tagged by `type` in `snake_case`, matching the
//! shape of [`crate::model::event::Event`] on the way back.

use serde::{Deserialize, Serialize};

use crate::model::ids::{
    AutomodRuleId, BookmarkId, CategoryId, ChannelId, EventId, InviteId, MessageId, RoleId,
    ServerId, TemplateId, UserId,
};

/// One channel reorder entry, as carried by `reorder_channels`.
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
pub enum Command {
    // --- Session ---
    /// `list_servers`: List servers.
    ListServers,

    // --- Servers ---
    /// `create_server`: Create server.
    CreateServer {
        /// Display name.
        name: String,
        /// URL of the icon image, if any.
        icon_url: Option<String>,
    },
    /// `join_server`: Join server.
    JoinServer {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `leave_server`: Leave server.
    LeaveServer {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `delete_server`: Delete server.
    DeleteServer {
        /// Which server this applies to.
        server_id: ServerId,
    },

    // --- Channels ---
    /// `list_channels`: List channels.
    ListChannels {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `create_channel`: Create channel.
    CreateChannel {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
        /// Which category this applies to.
        category_id: Option<CategoryId>,
        /// Whether this is private rather than server-visible.
        is_private: Option<bool>,
    },
    /// `delete_channel`: Delete channel.
    DeleteChannel {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },
    /// `set_topic`: Set topic.
    SetTopic {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Channel topic text.
        topic: String,
    },
    /// `join_channel`: Join channel.
    JoinChannel {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },
    /// `part_channel`: Part channel.
    PartChannel {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Optional human-readable reason, surfaced in the audit log.
        reason: Option<String>,
    },
    /// `reorder_channels`: Reorder channels.
    ReorderChannels {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channels affected by this change.
        channels: Vec<ChannelReorderEntry>,
    },
    /// `set_slow_mode`: Set slow mode.
    SetSlowMode {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Duration in seconds.
        seconds: u32,
    },
    /// `set_nsfw`: Set nsfw.
    SetNsfw {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Whether the channel is marked not-safe-for-work.
        is_nsfw: bool,
    },
    /// `set_announcement_channel`: Set announcement channel.
    SetAnnouncementChannel {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Whether the channel is an announcement channel.
        is_announcement: bool,
    },

    // --- Messages ---
    /// `send_message`: Send message.
    SendMessage {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Message body.
        content: String,
        /// The message being replied to, if any.
        reply_to: Option<MessageId>,
        /// Identifiers of attachments already uploaded via the REST collaborator.
        attachment_ids: Option<Vec<String>>,
    },
    /// `edit_message`: Edit message.
    EditMessage {
        /// Which message this applies to.
        message_id: MessageId,
        /// Message body.
        content: String,
    },
    /// `delete_message`: Delete message.
    DeleteMessage {
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `bulk_delete_messages`: Bulk delete messages.
    BulkDeleteMessages {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Identifiers of the affected messages.
        message_ids: Vec<MessageId>,
    },
    /// `fetch_history`: Fetch history.
    FetchHistory {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Only return entries older than this cursor.
        before: Option<MessageId>,
        /// Maximum number of results to return.
        limit: Option<u32>,
    },

    // --- Reactions & typing ---
    /// `add_reaction`: Add reaction.
    AddReaction {
        /// Which message this applies to.
        message_id: MessageId,
        /// Unicode emoji or `:custom_name:` identifier.
        emoji: String,
    },
    /// `remove_reaction`: Remove reaction.
    RemoveReaction {
        /// Which message this applies to.
        message_id: MessageId,
        /// Unicode emoji or `:custom_name:` identifier.
        emoji: String,
    },
    /// `typing`: Typing.
    Typing {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },

    // --- Members ---
    /// `get_members`: Get members.
    GetMembers {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },
    /// `update_member_role`: Update member role.
    UpdateMemberRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// The role involved.
        role: RoleId,
    },
    /// `set_server_nickname`: Set server nickname.
    SetServerNickname {
        /// Which server this applies to.
        server_id: ServerId,
        /// The nickname to use, or `None` to clear it.
        nickname: Option<String>,
    },

    // --- Roles ---
    /// `list_roles`: List roles.
    ListRoles {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `create_role`: Create role.
    CreateRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
    },
    /// `update_role`: Update role.
    UpdateRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which role this applies to.
        role_id: RoleId,
        /// Display name.
        name: Option<String>,
        /// Display color, if set.
        color: Option<u32>,
        /// Permission bitfield.
        permissions: Option<u64>,
        /// Sort position, lower sorts first.
        position: Option<i64>,
    },
    /// `delete_role`: Delete role.
    DeleteRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which role this applies to.
        role_id: RoleId,
    },
    /// `assign_role`: Assign role.
    AssignRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// Which role this applies to.
        role_id: RoleId,
    },
    /// `remove_role`: Remove role.
    RemoveRole {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// Which role this applies to.
        role_id: RoleId,
    },

    // --- Categories ---
    /// `list_categories`: List categories.
    ListCategories {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `create_category`: Create category.
    CreateCategory {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
    },
    /// `update_category`: Update category.
    UpdateCategory {
        /// Which category this applies to.
        category_id: CategoryId,
        /// Display name.
        name: Option<String>,
        /// Sort position, lower sorts first.
        position: Option<i64>,
    },
    /// `delete_category`: Delete category.
    DeleteCategory {
        /// Which category this applies to.
        category_id: CategoryId,
    },

    // --- Presence & profile ---
    /// `set_presence`: Set presence.
    SetPresence {
        /// Status value.
        status: String,
        /// Freeform status text the user set.
        custom_status: Option<String>,
        /// Emoji shown alongside the custom status.
        status_emoji: Option<String>,
    },
    /// `get_presences`: Get presences.
    GetPresences {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `get_user_profile`: Get user profile.
    GetUserProfile {
        /// Which user this applies to.
        user_id: UserId,
    },

    // --- Read state ---
    /// `mark_read`: Mark read.
    MarkRead {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `get_unread_counts`: Get unread counts.
    GetUnreadCounts {
        /// Which server this applies to.
        server_id: ServerId,
    },

    // --- Search & notifications ---
    /// `search_messages`: Search messages.
    SearchMessages {
        /// Which server this applies to.
        server_id: ServerId,
        /// Search query text.
        query: String,
        /// The channel name within the server.
        channel: Option<String>,
        /// Maximum number of results to return.
        limit: Option<u32>,
        /// Number of matching results to skip before the returned page.
        offset: Option<u32>,
    },
    /// `update_notification_settings`: Update notification settings.
    UpdateNotificationSettings {
        /// Which server this applies to.
        server_id: ServerId,
        /// Notification level.
        level: String,
        /// Whether `@everyone`/`@here` mentions are suppressed.
        suppress_everyone: Option<bool>,
        /// Whether role mentions are suppressed.
        suppress_roles: Option<bool>,
        /// Whether notifications are muted.
        muted: Option<bool>,
        /// When a temporary mute expires, if any.
        mute_until: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// `get_notification_settings`: Get notification settings.
    GetNotificationSettings {
        /// Which server this applies to.
        server_id: ServerId,
    },

    // --- Pins & threads ---
    /// `pin_message`: Pin message.
    PinMessage {
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `unpin_message`: Unpin message.
    UnpinMessage {
        /// Which message this applies to.
        message_id: MessageId,
    },
    /// `get_pinned_messages`: Get pinned messages.
    GetPinnedMessages {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },
    /// `create_thread`: Create thread.
    CreateThread {
        /// Which server this applies to.
        server_id: ServerId,
        /// Name of the channel the thread branches off of.
        parent_channel: String,
        /// Display name.
        name: String,
        /// Which message this applies to.
        message_id: MessageId,
        /// Whether this is private rather than server-visible.
        is_private: Option<bool>,
    },
    /// `archive_thread`: Archive thread.
    ArchiveThread {
        /// Which thread this applies to.
        thread_id: ChannelId,
    },
    /// `list_threads`: List threads.
    ListThreads {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: String,
    },

    // --- Bookmarks ---
    /// `add_bookmark`: Add bookmark.
    AddBookmark {
        /// Which message this applies to.
        message_id: MessageId,
        /// Freeform personal annotation.
        note: Option<String>,
    },
    /// `remove_bookmark`: Remove bookmark.
    RemoveBookmark {
        /// Which bookmark this applies to.
        bookmark_id: BookmarkId,
    },
    /// `list_bookmarks`: List bookmarks.
    ListBookmarks,

    // --- Moderation ---
    /// `kick_member`: Kick member.
    KickMember {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// Optional human-readable reason, surfaced in the audit log.
        reason: Option<String>,
    },
    /// `ban_member`: Ban member.
    BanMember {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// Optional human-readable reason, surfaced in the audit log.
        reason: Option<String>,
        /// How many days of the banned member's prior messages to delete.
        delete_message_days: Option<u32>,
    },
    /// `unban_member`: Unban member.
    UnbanMember {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
    },
    /// `list_bans`: List bans.
    ListBans {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `timeout_member`: Timeout member.
    TimeoutMember {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which user this applies to.
        user_id: UserId,
        /// When the timeout expires, or `None` to lift it immediately.
        timeout_until: Option<chrono::DateTime<chrono::Utc>>,
        /// Optional human-readable reason, surfaced in the audit log.
        reason: Option<String>,
    },
    /// `get_audit_log`: Get audit log.
    GetAuditLog {
        /// Which server this applies to.
        server_id: ServerId,
        /// Restrict results to entries of this action type.
        action_type: Option<String>,
        /// Maximum number of results to return.
        limit: Option<u32>,
        /// Only return entries older than this cursor.
        before: Option<String>,
    },
    /// `create_automod_rule`: Create automod rule.
    CreateAutomodRule {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
        /// Automod trigger configuration, opaque to the client.
        trigger: serde_json::Value,
        /// Automod action configuration, opaque to the client.
        actions: serde_json::Value,
    },
    /// `update_automod_rule`: Update automod rule.
    UpdateAutomodRule {
        /// Which server this applies to.
        server_id: ServerId,
        /// Which automod rule this applies to.
        rule_id: AutomodRuleId,
        /// Display name.
        name: Option<String>,
        /// Whether the rule is currently enforced.
        enabled: Option<bool>,
        /// Automod trigger configuration, opaque to the client.
        trigger: Option<serde_json::Value>,
        /// Automod action configuration, opaque to the client.
        actions: Option<serde_json::Value>,
    },
    /// `delete_automod_rule`: Delete automod rule.
    DeleteAutomodRule {
        /// Which automod rule this applies to.
        rule_id: AutomodRuleId,
    },
    /// `list_automod_rules`: List automod rules.
    ListAutomodRules {
        /// Which server this applies to.
        server_id: ServerId,
    },

    // --- Community ---
    /// `create_invite`: Create invite.
    CreateInvite {
        /// Which server this applies to.
        server_id: ServerId,
        /// The channel name within the server.
        channel: Option<String>,
        /// Maximum number of times the invite can be used, if limited.
        max_uses: Option<u64>,
        /// Seconds until the invite expires, if limited.
        expires_in: Option<u64>,
    },
    /// `list_invites`: List invites.
    ListInvites {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `delete_invite`: Delete invite.
    DeleteInvite {
        /// Which invite this applies to.
        invite_id: InviteId,
    },
    /// `use_invite`: Use invite.
    UseInvite {
        /// Invite code.
        code: String,
    },
    /// `create_event`: Create event.
    CreateEvent {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
        /// Human-readable description.
        description: Option<String>,
        /// When the event starts.
        starts_at: chrono::DateTime<chrono::Utc>,
        /// When the event ends, if known.
        ends_at: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// `list_events`: List events.
    ListEvents {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `update_event_status`: Update event status.
    UpdateEventStatus {
        /// Which scheduled event this applies to.
        event_id: EventId,
        /// Status value.
        status: String,
    },
    /// `delete_event`: Delete event.
    DeleteEvent {
        /// Which scheduled event this applies to.
        event_id: EventId,
    },
    /// `set_rsvp`: Set rsvp.
    SetRsvp {
        /// Which scheduled event this applies to.
        event_id: EventId,
    },
    /// `remove_rsvp`: Remove rsvp.
    RemoveRsvp {
        /// Which scheduled event this applies to.
        event_id: EventId,
    },
    /// `list_rsvps`: List rsvps.
    ListRsvps {
        /// Which scheduled event this applies to.
        event_id: EventId,
    },
    /// `update_community_settings`: Update community settings.
    UpdateCommunitySettings {
        /// Which server this applies to.
        server_id: ServerId,
        /// Human-readable description.
        description: Option<String>,
        /// Discovery category.
        category: Option<String>,
        /// Whether the server is listed in server discovery.
        discoverable: Option<bool>,
    },
    /// `get_community_settings`: Get community settings.
    GetCommunitySettings {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `discover_servers`: Discover servers.
    DiscoverServers {
        /// Discovery category.
        category: Option<String>,
    },
    /// `accept_rules`: Accept rules.
    AcceptRules {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `follow_channel`: Follow channel.
    FollowChannel {
        /// Which channel this applies to.
        channel_id: ChannelId,
        /// Channel being followed.
        target_channel_id: ChannelId,
    },
    /// `unfollow_channel`: Unfollow channel.
    UnfollowChannel {
        /// Identifier of the follow relationship.
        follow_id: String,
    },
    /// `list_channel_follows`: List channel follows.
    ListChannelFollows {
        /// Which channel this applies to.
        channel_id: ChannelId,
    },
    /// `create_template`: Create template.
    CreateTemplate {
        /// Which server this applies to.
        server_id: ServerId,
        /// Display name.
        name: String,
        /// Human-readable description.
        description: Option<String>,
    },
    /// `list_templates`: List templates.
    ListTemplates {
        /// Which server this applies to.
        server_id: ServerId,
    },
    /// `delete_template`: Delete template.
    DeleteTemplate {
        /// Which template this applies to.
        template_id: TemplateId,
    },
}

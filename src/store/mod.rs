//! The normalized state mirror (§3) and its reducers.
//!
//! `Store` is the CSE's single source of truth. It is owned exclusively by
//! the engine task (see [`crate::engine`]); nothing outside this crate ever
//! gets a `&mut Store`. Reads leave through [`crate::store::selectors`],
//! which hands out `Arc`-shared collections so a view layer comparing by
//! pointer identity (§4.6) never sees a spurious change.

pub mod reducers;
pub mod selectors;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::model::ids::{CategoryId, ChannelKey, RoleId, ServerId, UserId};
use crate::model::wire::{
    AuditEntry, AutomodRule, Ban, Bookmark, Category, Channel, CommunitySettings, ForumTag,
    Invite, Member, Message, NotificationSettings, PinnedMessage, Presence, ReplyInfo, Role,
    ScheduledEvent, SearchState, Template, Thread, UserProfile,
};

/// Returns the same `Arc` every call; used as the empty-collection sentinel
/// for every per-key map in `Store` (§3 invariant 6, §4.6 rule 1).
macro_rules! empty_sentinel {
    ($fn_name:ident, $ty:ty) => {
        pub fn $fn_name() -> Arc<$ty> {
            static EMPTY: Lazy<Arc<$ty>> = Lazy::new(|| Arc::new(Default::default()));
            EMPTY.clone()
        }
    };
}

empty_sentinel!(empty_channels, Vec<Channel>);
empty_sentinel!(empty_categories, Vec<Category>);
empty_sentinel!(empty_roles, Vec<Role>);
empty_sentinel!(empty_messages, Vec<Message>);
empty_sentinel!(empty_members, Vec<Member>);
empty_sentinel!(empty_typing_users, Vec<String>);
empty_sentinel!(empty_presences, HashMap<UserId, Presence>);
empty_sentinel!(empty_custom_emoji, HashMap<String, String>);
empty_sentinel!(empty_pinned_messages, Vec<PinnedMessage>);
empty_sentinel!(empty_threads, Vec<Thread>);
empty_sentinel!(empty_forum_tags, Vec<ForumTag>);
empty_sentinel!(empty_bans, Vec<Ban>);
empty_sentinel!(empty_audit_log, Vec<AuditEntry>);
empty_sentinel!(empty_automod_rules, Vec<AutomodRule>);
empty_sentinel!(empty_invites, Vec<Invite>);
empty_sentinel!(empty_server_events, Vec<ScheduledEvent>);
empty_sentinel!(empty_templates, Vec<Template>);
empty_sentinel!(empty_servers, Vec<crate::model::wire::Server>);
empty_sentinel!(empty_bookmarks, Vec<Bookmark>);
empty_sentinel!(empty_discoverable_servers, Vec<CommunitySettings>);

/// The normalized, denormalized-for-read state mirror (§3's "Top-level store
/// shape" table).
///
/// Every map is `Clone`-cheap: `Arc<Vec<T>>`/`Arc<HashMap<..>>` values mean
/// cloning `Store` to publish a new snapshot only bumps refcounts for keys
/// the last reducer did not touch, and allocates fresh `Arc`s only for the
/// keys it did (§4.6 rule 2, "structural sharing on update").
#[derive(Clone)]
pub struct Store {
    /// Whether the transport currently holds an open socket.
    pub connected: bool,
    /// The viewer's own nickname, once known.
    pub nickname: Option<String>,
    /// Every server the viewer belongs to.
    pub servers: Arc<Vec<crate::model::wire::Server>>,

    /// Channels per server.
    pub channels: HashMap<ServerId, Arc<Vec<Channel>>>,
    /// Categories per server.
    pub categories: HashMap<ServerId, Arc<Vec<Category>>>,
    /// Roles per server.
    pub roles: HashMap<ServerId, Arc<Vec<Role>>>,
    /// Loaded messages per channel, oldest first.
    pub messages: HashMap<ChannelKey, Arc<Vec<Message>>>,
    /// Member list per channel.
    pub members: HashMap<ChannelKey, Arc<Vec<Member>>>,
    /// Whether more history exists before the oldest loaded message, per channel.
    pub has_more: HashMap<ChannelKey, bool>,
    /// Unread message count per channel; an absent key means zero (§3 invariant 4).
    pub unread_counts: HashMap<ChannelKey, u64>,
    /// Nicknames currently typing, per channel.
    pub typing_users: HashMap<ChannelKey, Arc<Vec<String>>>,
    /// Presence records per server, keyed by user.
    pub presences: HashMap<ServerId, Arc<HashMap<UserId, Presence>>>,
    /// Custom emoji per server, name to URL.
    pub custom_emoji: HashMap<ServerId, Arc<HashMap<String, String>>>,
    /// Pinned message markers per channel.
    pub pinned_messages: HashMap<ChannelKey, Arc<Vec<PinnedMessage>>>,
    /// Threads per channel.
    pub threads: HashMap<ChannelKey, Arc<Vec<Thread>>>,
    /// Forum tag definitions per channel.
    pub forum_tags: HashMap<ChannelKey, Arc<Vec<ForumTag>>>,
    /// Ban records per server.
    pub bans: HashMap<ServerId, Arc<Vec<Ban>>>,
    /// Audit log entries per server.
    pub audit_log: HashMap<ServerId, Arc<Vec<AuditEntry>>>,
    /// Automod rules per server.
    pub automod_rules: HashMap<ServerId, Arc<Vec<AutomodRule>>>,
    /// Invites per server.
    pub invites: HashMap<ServerId, Arc<Vec<Invite>>>,
    /// Scheduled events per server.
    pub server_events: HashMap<ServerId, Arc<Vec<ScheduledEvent>>>,
    /// Community/discovery settings per server.
    pub community_settings: HashMap<ServerId, CommunitySettings>,
    /// Reusable templates per server.
    pub templates: HashMap<ServerId, Arc<Vec<Template>>>,
    /// Public profiles fetched or pushed so far, keyed by user.
    pub user_profiles: HashMap<UserId, UserProfile>,
    /// Avatar URLs resolved so far, keyed by nickname.
    pub avatars: HashMap<String, String>,
    /// The viewer's bookmarked messages.
    pub bookmarks: Arc<Vec<Bookmark>>,
    /// Servers surfaced by the last discovery listing.
    pub discoverable_servers: Arc<Vec<CommunitySettings>>,
    /// Result of the last `search_messages` round trip, if any.
    pub search: Option<SearchState>,
    /// The message the viewer is currently composing a reply to, if any.
    pub replying_to: Option<ReplyInfo>,
    /// Notification preferences per server.
    pub notification_settings: HashMap<ServerId, NotificationSettings>,

    /// Category positions are not otherwise tracked per-server here; roles
    /// keep their server grouping via the map key, categories likewise.
    /// Kept for symmetry with `roles`/`channels` lookups used by reducers.
    pub category_owner: HashMap<CategoryId, ServerId>,
    pub role_owner: HashMap<RoleId, ServerId>,

    /// Bumped on every `connect()` (§5 "session epoch"); in-flight REST
    /// futures launched before a `disconnect()` compare against this and
    /// drop their result if it has since moved on.
    pub session_epoch: u64,

    /// Monotonic generation per (channelKey, nickname) typing indicator,
    /// bumped on every fresh `typing_start` for that pair so a stale expiry
    /// timer can recognize it has been superseded (§5 "Cancellation").
    pub typing_generation: HashMap<(ChannelKey, String), u64>,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            connected: false,
            nickname: None,
            servers: empty_servers(),
            channels: HashMap::new(),
            categories: HashMap::new(),
            roles: HashMap::new(),
            messages: HashMap::new(),
            members: HashMap::new(),
            has_more: HashMap::new(),
            unread_counts: HashMap::new(),
            typing_users: HashMap::new(),
            presences: HashMap::new(),
            custom_emoji: HashMap::new(),
            pinned_messages: HashMap::new(),
            threads: HashMap::new(),
            forum_tags: HashMap::new(),
            bans: HashMap::new(),
            audit_log: HashMap::new(),
            automod_rules: HashMap::new(),
            invites: HashMap::new(),
            server_events: HashMap::new(),
            community_settings: HashMap::new(),
            templates: HashMap::new(),
            user_profiles: HashMap::new(),
            avatars: HashMap::new(),
            bookmarks: empty_bookmarks(),
            discoverable_servers: empty_discoverable_servers(),
            search: None,
            replying_to: None,
            notification_settings: HashMap::new(),
            category_owner: HashMap::new(),
            role_owner: HashMap::new(),
            session_epoch: 0,
            typing_generation: HashMap::new(),
        }
    }
}

impl Store {
    /// Reset every server-derived map to its empty sentinel, preserving
    /// nothing server-side. The UI intent store lives outside `Store`
    /// entirely (§4.5 note: "out-of-band, but part of the CSE"), so it is
    /// untouched by this — see [`crate::ui::UiState`] (§3 lifecycle,
    /// scenario S6).
    pub fn reset_on_disconnect(&mut self) {
        let epoch = self.session_epoch;
        *self = Store {
            session_epoch: epoch,
            ..Store::default()
        };
    }
}

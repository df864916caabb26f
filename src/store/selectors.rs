//! Referentially-stable read accessors over a [`Store`] snapshot (§4.6).
//!
//! Every accessor here either returns the `Arc` a reducer actually stored,
//! or one of the per-type empty sentinels from [`crate::store`] — never a
//! freshly allocated empty collection, since that would break identity
//! comparisons in a subscribing view layer.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::ids::{CategoryId, ChannelKey, RoleId, ServerId, UserId};
use crate::model::wire::{
    AuditEntry, AutomodRule, Ban, Category, Channel, ForumTag, Invite, Member, Message,
    PinnedMessage, Presence, Role, ScheduledEvent, Server, Template, Thread,
};

use super::{
    empty_audit_log, empty_automod_rules, empty_bans, empty_categories, empty_channels,
    empty_custom_emoji, empty_forum_tags, empty_invites, empty_members, empty_messages,
    empty_pinned_messages, empty_presences, empty_roles, empty_server_events, empty_templates,
    empty_threads, empty_typing_users, Store,
};

pub fn servers(store: &Store) -> Arc<Vec<Server>> {
    store.servers.clone()
}

pub fn channels(store: &Store, server_id: &ServerId) -> Arc<Vec<Channel>> {
    store
        .channels
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_channels)
}

pub fn categories(store: &Store, server_id: &ServerId) -> Arc<Vec<Category>> {
    store
        .categories
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_categories)
}

pub fn roles(store: &Store, server_id: &ServerId) -> Arc<Vec<Role>> {
    store
        .roles
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_roles)
}

pub fn messages(store: &Store, key: &ChannelKey) -> Arc<Vec<Message>> {
    store
        .messages
        .get(key)
        .cloned()
        .unwrap_or_else(empty_messages)
}

pub fn members(store: &Store, key: &ChannelKey) -> Arc<Vec<Member>> {
    store
        .members
        .get(key)
        .cloned()
        .unwrap_or_else(empty_members)
}

pub fn has_more(store: &Store, key: &ChannelKey) -> bool {
    store.has_more.get(key).copied().unwrap_or(false)
}

pub fn unread_count(store: &Store, key: &ChannelKey) -> u64 {
    store.unread_counts.get(key).copied().unwrap_or(0)
}

pub fn typing_users(store: &Store, key: &ChannelKey) -> Arc<Vec<String>> {
    store
        .typing_users
        .get(key)
        .cloned()
        .unwrap_or_else(empty_typing_users)
}

pub fn presences(store: &Store, server_id: &ServerId) -> Arc<HashMap<UserId, Presence>> {
    store
        .presences
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_presences)
}

pub fn custom_emoji(store: &Store, server_id: &ServerId) -> Arc<HashMap<String, String>> {
    store
        .custom_emoji
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_custom_emoji)
}

pub fn pinned_messages(store: &Store, key: &ChannelKey) -> Arc<Vec<PinnedMessage>> {
    store
        .pinned_messages
        .get(key)
        .cloned()
        .unwrap_or_else(empty_pinned_messages)
}

pub fn threads(store: &Store, key: &ChannelKey) -> Arc<Vec<Thread>> {
    store
        .threads
        .get(key)
        .cloned()
        .unwrap_or_else(empty_threads)
}

pub fn forum_tags(store: &Store, key: &ChannelKey) -> Arc<Vec<ForumTag>> {
    store
        .forum_tags
        .get(key)
        .cloned()
        .unwrap_or_else(empty_forum_tags)
}

pub fn bans(store: &Store, server_id: &ServerId) -> Arc<Vec<Ban>> {
    store
        .bans
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_bans)
}

pub fn audit_log(store: &Store, server_id: &ServerId) -> Arc<Vec<AuditEntry>> {
    store
        .audit_log
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_audit_log)
}

pub fn automod_rules(store: &Store, server_id: &ServerId) -> Arc<Vec<AutomodRule>> {
    store
        .automod_rules
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_automod_rules)
}

pub fn invites(store: &Store, server_id: &ServerId) -> Arc<Vec<Invite>> {
    store
        .invites
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_invites)
}

pub fn server_events(store: &Store, server_id: &ServerId) -> Arc<Vec<ScheduledEvent>> {
    store
        .server_events
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_server_events)
}

pub fn templates(store: &Store, server_id: &ServerId) -> Arc<Vec<Template>> {
    store
        .templates
        .get(server_id)
        .cloned()
        .unwrap_or_else(empty_templates)
}

pub fn bookmarks(store: &Store) -> Arc<Vec<crate::model::wire::Bookmark>> {
    store.bookmarks.clone()
}

pub fn avatar(store: &Store, nickname: &str) -> Option<String> {
    store.avatars.get(nickname).cloned()
}

pub fn role_server(store: &Store, role_id: &RoleId) -> Option<ServerId> {
    store.role_owner.get(role_id).cloned()
}

pub fn category_server(store: &Store, category_id: &CategoryId) -> Option<ServerId> {
    store.category_owner.get(category_id).cloned()
}

//! Pure `(state, event) -> state` reducers for every event in §4.3.
//!
//! [`apply`] is the one entry point the dispatcher calls. It never panics on
//! malformed-but-well-typed input and never partially mutates: it works on a
//! clone of the incoming `Store` and only swaps that clone in once it is
//! fully built (§7: "the store is never observably partially updated").
//!
//! The `channel_list` reducer is the one exception to "reducers never cause
//! I/O" (§9 "Side-effectful reducer"): it returns [`Effect::Send`] commands
//! alongside the new store, which the engine dispatches after installing the
//! delta so the observable event order in scenario S7 is preserved.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::command::Command;
use crate::model::event::Event;
use crate::model::ids::ChannelKey;
use crate::model::wire::ReactionGroup;

use super::Store;

/// Something produced by a reducer besides the new store state: either an
/// outbound command (the `channel_list` priming, §9) or a request to
/// schedule a typing-indicator expiry (§5 "Cancellation").
#[derive(Debug, Clone)]
pub enum Effect {
    Send(Command),
    ScheduleTypingExpiry {
        key: ChannelKey,
        nickname: String,
        generation: u64,
    },
}

/// Apply one inbound event to `store`, returning the new store and any
/// effects it produced. `store` itself is not mutated.
pub fn apply(store: &Store, event: &Event) -> (Store, Vec<Effect>) {
    let mut next = store.clone();
    let mut effects = Vec::new();

    match event {
        Event::Message {
            server_id,
            target,
            from,
            id,
            content,
            timestamp,
            avatar_url,
            reply_to_id,
            attachment_ids: _,
        } => {
            let server_id = server_id
                .clone()
                .unwrap_or_else(|| crate::model::ids::ServerId::from("default"));
            let key = ChannelKey::new(&server_id, target);
            let reply_to = reply_to_id.as_ref().and_then(|reply_id| {
                messages_in(&next, &key)
                    .iter()
                    .find(|m| &m.id == reply_id)
                    .map(|m| {
                        crate::model::wire::ReplyInfo::from_message(
                            reply_id.clone(),
                            m.author.clone(),
                            &m.content,
                        )
                    })
            });
            let message = crate::model::wire::Message {
                id: id.clone(),
                author: from.clone(),
                content: content.clone(),
                timestamp: *timestamp,
                edited_at: None,
                reply_to,
                reactions: Vec::new(),
                attachments: Vec::new(),
                embeds: Vec::new(),
            };

            let mut list = (*messages_in(&next, &key)).clone();
            // Dedupe defensively against the echo of an optimistic local
            // send (§9 "Optimistic sends and echoes"): if this id is
            // already present — our own local copy — the authoritative
            // server copy replaces it in place instead of appending a
            // duplicate.
            match list.iter().position(|m| m.id == message.id) {
                Some(index) => list[index] = message,
                None => list.push(message),
            }
            next.messages.insert(key.clone(), Arc::new(list));

            if let Some(url) = avatar_url {
                if !url.is_empty() {
                    next.avatars.insert(from.clone(), url.clone());
                }
            }

            if Some(from.as_str()) != next.nickname.as_deref() {
                *next.unread_counts.entry(key).or_insert(0) += 1;
            }
        }

        Event::MessageEdit {
            message_id,
            content,
            edited_at,
        } => {
            edit_messages(&mut next, |m| {
                if &m.id == message_id {
                    m.content = content.clone();
                    m.edited_at = Some(*edited_at);
                    true
                } else {
                    false
                }
            });
        }

        Event::MessageDelete { message_id } => {
            retain_messages(&mut next, |m| &m.id != message_id);
        }

        Event::MessageEmbed { message_id, embeds } => {
            edit_messages(&mut next, |m| {
                if &m.id == message_id {
                    m.embeds = embeds.clone();
                    true
                } else {
                    false
                }
            });
        }

        Event::BulkMessageDelete { message_ids } => {
            retain_messages(&mut next, |m| !message_ids.contains(&m.id));
        }

        Event::ReactionAdd {
            message_id,
            emoji,
            user_id,
        } => {
            edit_messages(&mut next, |m| {
                if &m.id != message_id {
                    return false;
                }
                match m.reactions.iter_mut().find(|r| &r.emoji == emoji) {
                    Some(group) => {
                        if !group.user_ids.contains(user_id) {
                            group.user_ids.push(user_id.clone());
                            group.recompute_count();
                        }
                    }
                    None => m.reactions.push(ReactionGroup {
                        emoji: emoji.clone(),
                        user_ids: vec![user_id.clone()],
                        count: 1,
                    }),
                }
                true
            });
        }

        Event::ReactionRemove {
            message_id,
            emoji,
            user_id,
        } => {
            edit_messages(&mut next, |m| {
                if &m.id != message_id {
                    return false;
                }
                if let Some(index) = m.reactions.iter().position(|r| &r.emoji == emoji) {
                    let group = &mut m.reactions[index];
                    group.user_ids.retain(|u| u != user_id);
                    group.recompute_count();
                    if group.count == 0 {
                        m.reactions.remove(index);
                    }
                }
                true
            });
        }

        Event::TypingStart {
            server_id,
            channel,
            nickname,
        } => {
            if Some(nickname.as_str()) == next.nickname.as_deref() {
                // Self-suppression (§4.3, scenario S5): we never show our
                // own typing indicator back to ourselves.
                return (next, effects);
            }
            let key = ChannelKey::new(server_id, channel);
            let mut list = (*typing_users_in(&next, &key)).clone();
            if !list.iter().any(|n| n == nickname) {
                list.push(nickname.clone());
            }
            next.typing_users.insert(key.clone(), Arc::new(list));

            let generation_key = (key.clone(), nickname.clone());
            let generation = next.typing_generation.get(&generation_key).copied().unwrap_or(0) + 1;
            next.typing_generation.insert(generation_key, generation);

            effects.push(Effect::ScheduleTypingExpiry {
                key,
                nickname: nickname.clone(),
                generation,
            });
        }

        Event::PresenceUpdate {
            server_id,
            presence,
        } => {
            let mut map = (*next
                .presences
                .get(server_id)
                .cloned()
                .unwrap_or_else(super::empty_presences))
            .clone();
            map.insert(
                presence.user_id.clone(),
                crate::model::wire::Presence {
                    user_id: presence.user_id.clone(),
                    status: parse_status(&presence.status),
                    custom_status: presence.custom_status.clone(),
                    status_emoji: presence.status_emoji.clone(),
                },
            );
            next.presences.insert(server_id.clone(), Arc::new(map));
        }

        Event::PresenceList {
            server_id,
            presences,
        } => {
            let map = presences
                .iter()
                .map(|p| {
                    (
                        p.user_id.clone(),
                        crate::model::wire::Presence {
                            user_id: p.user_id.clone(),
                            status: parse_status(&p.status),
                            custom_status: p.custom_status.clone(),
                            status_emoji: p.status_emoji.clone(),
                        },
                    )
                })
                .collect();
            next.presences.insert(server_id.clone(), Arc::new(map));
        }

        Event::Join {
            server_id,
            channel,
            member,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let mut list = (*members_in(&next, &key)).clone();
            if !list.iter().any(|m| m.nickname == member.nickname) {
                list.push(crate::model::wire::Member {
                    nickname: member.nickname.clone(),
                    avatar_url: member.avatar_url.clone(),
                    user_id: member.user_id.clone(),
                    status: None,
                    custom_status: None,
                    status_emoji: None,
                });
            }
            next.members.insert(key, Arc::new(list));
            if let Some(url) = &member.avatar_url {
                if !url.is_empty() {
                    next.avatars.insert(member.nickname.clone(), url.clone());
                }
            }
        }

        Event::Part {
            server_id,
            channel,
            nickname,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let mut list = (*members_in(&next, &key)).clone();
            list.retain(|m| &m.nickname != nickname);
            next.members.insert(key, Arc::new(list));
        }

        Event::Quit { nickname } => {
            let keys: Vec<_> = next.members.keys().cloned().collect();
            for key in keys {
                let mut list = (*next.members[&key]).clone();
                let before = list.len();
                list.retain(|m| &m.nickname != nickname);
                if list.len() != before {
                    next.members.insert(key, Arc::new(list));
                }
            }
        }

        Event::Names {
            server_id,
            channel,
            members,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let list: Vec<_> = members
                .iter()
                .map(|m| crate::model::wire::Member {
                    nickname: m.nickname.clone(),
                    avatar_url: m.avatar_url.clone(),
                    user_id: m.user_id.clone(),
                    status: None,
                    custom_status: None,
                    status_emoji: None,
                })
                .collect();
            for member in &list {
                if let Some(url) = &member.avatar_url {
                    if !url.is_empty() {
                        next.avatars.insert(member.nickname.clone(), url.clone());
                    }
                }
            }
            next.members.insert(key, Arc::new(list));
        }

        Event::NickChange { .. } => {
            // No store-shape entry is defined for nickname history; the
            // avatar/member maps are keyed by current nickname and are
            // refreshed by the next `names`/`join` for the affected channel.
        }

        Event::Topic {
            server_id,
            channel,
            topic,
        }
        | Event::TopicChange {
            server_id,
            channel,
            topic,
        } => {
            patch_channel(&mut next, server_id, channel, |c| c.topic = Some(topic.clone()));
        }

        Event::ChannelList {
            server_id,
            channels,
        } => {
            next.channels
                .insert(server_id.clone(), Arc::new(channels.clone()));

            // Side-effectful priming (§4.3, scenario S7): order matters.
            effects.push(Effect::Send(Command::ListRoles {
                server_id: server_id.clone(),
            }));
            effects.push(Effect::Send(Command::ListCategories {
                server_id: server_id.clone(),
            }));
            effects.push(Effect::Send(Command::GetPresences {
                server_id: server_id.clone(),
            }));
        }

        Event::ChannelReorder {
            server_id,
            channels,
        } => {
            let mut list = (*next
                .channels
                .get(server_id)
                .cloned()
                .unwrap_or_else(super::empty_channels))
            .clone();
            for entry in channels {
                if let Some(channel) = list.iter_mut().find(|c| &c.id == &entry.id) {
                    channel.position = entry.position;
                    channel.category_id = entry.category_id.clone();
                }
            }
            next.channels.insert(server_id.clone(), Arc::new(list));
        }

        Event::SlowModeUpdate {
            server_id,
            channel,
            seconds,
        } => {
            patch_channel(&mut next, server_id, channel, |c| c.slowmode_seconds = *seconds);
        }

        Event::NsfwUpdate {
            server_id,
            channel,
            is_nsfw,
        } => {
            patch_channel(&mut next, server_id, channel, |c| c.is_nsfw = *is_nsfw);
        }

        Event::CategoryList {
            server_id,
            categories,
        } => {
            for category in categories {
                next.category_owner
                    .insert(category.id.clone(), server_id.clone());
            }
            next.categories
                .insert(server_id.clone(), Arc::new(categories.clone()));
        }

        Event::CategoryUpdate { category } => {
            next.category_owner
                .insert(category.id.clone(), category.server_id.clone());
            let mut list = (*next
                .categories
                .get(&category.server_id)
                .cloned()
                .unwrap_or_else(super::empty_categories))
            .clone();
            match list.iter().position(|c| c.id == category.id) {
                Some(index) => list[index] = category.clone(),
                None => list.push(category.clone()),
            }
            next.categories
                .insert(category.server_id.clone(), Arc::new(list));
        }

        Event::CategoryDelete {
            server_id,
            category_id,
        } => {
            next.category_owner.remove(category_id);
            if let Some(list) = next.categories.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|c| &c.id != category_id);
                next.categories.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::RoleList { server_id, roles } => {
            for role in roles {
                next.role_owner.insert(role.id.clone(), server_id.clone());
            }
            let mut sorted = roles.clone();
            sorted.sort_by(|a, b| b.position.cmp(&a.position));
            next.roles.insert(server_id.clone(), Arc::new(sorted));
        }

        Event::RoleUpdate { role } => {
            next.role_owner.insert(role.id.clone(), role.server_id.clone());
            let mut list = (*next
                .roles
                .get(&role.server_id)
                .cloned()
                .unwrap_or_else(super::empty_roles))
            .clone();
            match list.iter().position(|r| r.id == role.id) {
                Some(index) => list[index] = role.clone(),
                None => list.push(role.clone()),
            }
            list.sort_by(|a, b| b.position.cmp(&a.position));
            next.roles.insert(role.server_id.clone(), Arc::new(list));
        }

        Event::RoleDelete { server_id, role_id } => {
            next.role_owner.remove(role_id);
            if let Some(list) = next.roles.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|r| &r.id != role_id);
                next.roles.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::MemberRoleUpdate { .. } => {
            // Role assignment detail is not separately tracked per-member
            // in the channel-scoped `Member` view (§3); the server-wide
            // `roles` map already reflects role definitions. No mutation.
        }

        Event::History {
            server_id,
            channel,
            messages,
            has_more,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let mut prefix = messages.clone();
            // The server sends newest-first; reverse to ascending, then
            // prepend ahead of whatever is already loaded (§4.3).
            prefix.reverse();
            let mut list = prefix;
            list.extend((*messages_in(&next, &key)).clone());
            next.messages.insert(key.clone(), Arc::new(list));
            next.has_more.insert(key, *has_more);
        }

        Event::ServerList { servers } => {
            next.servers = Arc::new(servers.clone());
        }

        Event::UnreadCounts { counts } => {
            for (raw_key, count) in counts {
                let key = ChannelKey::from_raw(raw_key.clone());
                // §3 invariant 4: a zero count is key absence, not a stored
                // zero, so selectors reading a freshly-synced channel see
                // the same empty default as one that was never touched.
                if *count == 0 {
                    next.unread_counts.remove(&key);
                } else {
                    next.unread_counts.insert(key, *count);
                }
            }
        }

        Event::ServerNotice { message } => {
            debug!("server notice: {message}");
        }

        Event::UserProfile { profile } => {
            next.user_profiles
                .insert(profile.user_id.clone(), profile.clone());
        }

        Event::ServerNicknameUpdate { .. } => {
            // Acknowledge only (§4.3); surfaces refresh on next explicit query.
        }

        Event::NotificationSettings { settings } => {
            next.notification_settings
                .insert(settings.server_id.clone(), settings.clone());
        }

        Event::SearchResults {
            query,
            results,
            total_count,
        } => {
            next.search = Some(crate::model::wire::SearchState {
                query: query.clone(),
                results: Some(results.clone()),
                total_count: *total_count,
            });
        }

        Event::MessagePin {
            server_id,
            channel,
            pin,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let mut list = (*next
                .pinned_messages
                .get(&key)
                .cloned()
                .unwrap_or_else(super::empty_pinned_messages))
            .clone();
            list.push(pin.clone());
            next.pinned_messages.insert(key, Arc::new(list));
        }

        Event::MessageUnpin {
            server_id,
            channel,
            message_id,
        } => {
            let key = ChannelKey::new(server_id, channel);
            if let Some(list) = next.pinned_messages.get(&key) {
                let mut list = (**list).clone();
                list.retain(|p| &p.message_id != message_id);
                next.pinned_messages.insert(key, Arc::new(list));
            }
        }

        Event::PinnedMessages {
            server_id,
            channel,
            pins,
        } => {
            let key = ChannelKey::new(server_id, channel);
            next.pinned_messages.insert(key, Arc::new(pins.clone()));
        }

        Event::ThreadCreate { thread } | Event::ThreadUpdate { thread } => {
            let key = ChannelKey::new(
                &owning_server_of_channel(&next, &thread.parent_channel_id)
                    .unwrap_or_else(|| crate::model::ids::ServerId::from("default")),
                thread.parent_channel_id.as_str(),
            );
            let mut list = (*next
                .threads
                .get(&key)
                .cloned()
                .unwrap_or_else(super::empty_threads))
            .clone();
            match list.iter().position(|t| t.id == thread.id) {
                Some(index) => list[index] = thread.clone(),
                None => list.push(thread.clone()),
            }
            next.threads.insert(key, Arc::new(list));
        }

        Event::ThreadList {
            server_id,
            channel,
            threads,
        } => {
            let key = ChannelKey::new(server_id, channel);
            next.threads.insert(key, Arc::new(threads.clone()));
        }

        Event::ForumTagList {
            server_id,
            channel,
            tags,
        } => {
            let key = ChannelKey::new(server_id, channel);
            next.forum_tags.insert(key, Arc::new(tags.clone()));
        }

        Event::ForumTagUpdate {
            server_id,
            channel,
            tag,
        } => {
            let key = ChannelKey::new(server_id, channel);
            let mut list = (*next
                .forum_tags
                .get(&key)
                .cloned()
                .unwrap_or_else(super::empty_forum_tags))
            .clone();
            match list.iter().position(|t| t.id == tag.id) {
                Some(index) => list[index] = tag.clone(),
                None => list.push(tag.clone()),
            }
            next.forum_tags.insert(key, Arc::new(list));
        }

        Event::ForumTagDelete {
            server_id,
            channel,
            tag_id,
        } => {
            let key = ChannelKey::new(server_id, channel);
            if let Some(list) = next.forum_tags.get(&key) {
                let mut list = (**list).clone();
                list.retain(|t| &t.id != tag_id);
                next.forum_tags.insert(key, Arc::new(list));
            }
        }

        Event::BookmarkList { bookmarks } => {
            next.bookmarks = Arc::new(bookmarks.clone());
        }

        Event::BookmarkAdd { bookmark } => {
            let mut list = (*next.bookmarks).clone();
            list.push(bookmark.clone());
            next.bookmarks = Arc::new(list);
        }

        Event::BookmarkRemove { bookmark_id } => {
            let mut list = (*next.bookmarks).clone();
            list.retain(|b| &b.id != bookmark_id);
            next.bookmarks = Arc::new(list);
        }

        Event::MemberKick { server_id, user_id } | Event::MemberBan { server_id, user_id } => {
            remove_member_from_server(&mut next, server_id, user_id);
        }

        Event::MemberUnban { .. } | Event::MemberTimeout { .. } => {
            // Acknowledge only (§4.3); surfaces refresh on next explicit query.
        }

        Event::AuditLogEntries { server_id, entries } => {
            next.audit_log.insert(server_id.clone(), Arc::new(entries.clone()));
        }

        Event::BanList { server_id, bans } => {
            next.bans.insert(server_id.clone(), Arc::new(bans.clone()));
        }

        Event::AutomodRuleList { server_id, rules } => {
            next.automod_rules
                .insert(server_id.clone(), Arc::new(rules.clone()));
        }

        Event::AutomodRuleUpdate { rule } => {
            let mut list = (*next
                .automod_rules
                .get(&rule.server_id)
                .cloned()
                .unwrap_or_else(super::empty_automod_rules))
            .clone();
            match list.iter().position(|r| r.id == rule.id) {
                Some(index) => list[index] = rule.clone(),
                None => list.push(rule.clone()),
            }
            next.automod_rules
                .insert(rule.server_id.clone(), Arc::new(list));
        }

        Event::AutomodRuleDelete { server_id, rule_id } => {
            if let Some(list) = next.automod_rules.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|r| &r.id != rule_id);
                next.automod_rules.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::InviteList { server_id, invites } => {
            next.invites.insert(server_id.clone(), Arc::new(invites.clone()));
        }

        Event::InviteCreate { invite } => {
            let mut list = (*next
                .invites
                .get(&invite.server_id)
                .cloned()
                .unwrap_or_else(super::empty_invites))
            .clone();
            list.push(invite.clone());
            next.invites.insert(invite.server_id.clone(), Arc::new(list));
        }

        Event::InviteDelete {
            server_id,
            invite_id,
        } => {
            if let Some(list) = next.invites.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|i| &i.id != invite_id);
                next.invites.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::EventList { server_id, events } => {
            next.server_events
                .insert(server_id.clone(), Arc::new(events.clone()));
        }

        Event::EventUpdate { event } => {
            let mut list = (*next
                .server_events
                .get(&event.server_id)
                .cloned()
                .unwrap_or_else(super::empty_server_events))
            .clone();
            match list.iter().position(|e| e.id == event.id) {
                Some(index) => list[index] = event.clone(),
                None => list.push(event.clone()),
            }
            next.server_events
                .insert(event.server_id.clone(), Arc::new(list));
        }

        Event::EventDelete {
            server_id,
            event_id,
        } => {
            if let Some(list) = next.server_events.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|e| &e.id != event_id);
                next.server_events.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::EventRsvpList { .. } => {
            // RSVP lists are fetched on demand by the host application and
            // are not otherwise cached in the store shape (§3).
        }

        Event::ServerCommunity { settings } => {
            next.community_settings
                .insert(settings.server_id.clone(), settings.clone());
        }

        Event::DiscoverServers { servers } => {
            next.discoverable_servers = Arc::new(servers.clone());
        }

        Event::ChannelFollowList { .. }
        | Event::ChannelFollowCreate { .. }
        | Event::ChannelFollowDelete { .. } => {
            // Channel follows are not part of the store shape in §3; the
            // host application owns this surface directly over REST.
        }

        Event::TemplateList {
            server_id,
            templates,
        } => {
            next.templates
                .insert(server_id.clone(), Arc::new(templates.clone()));
        }

        Event::TemplateUpdate { template } => {
            let mut list = (*next
                .templates
                .get(&template.server_id)
                .cloned()
                .unwrap_or_else(super::empty_templates))
            .clone();
            match list.iter().position(|t| t.id == template.id) {
                Some(index) => list[index] = template.clone(),
                None => list.push(template.clone()),
            }
            next.templates
                .insert(template.server_id.clone(), Arc::new(list));
        }

        Event::TemplateDelete {
            server_id,
            template_id,
        } => {
            if let Some(list) = next.templates.get(server_id) {
                let mut list = (**list).clone();
                list.retain(|t| &t.id != template_id);
                next.templates.insert(server_id.clone(), Arc::new(list));
            }
        }

        Event::Error { code, message } => {
            warn!("server error event: {code}: {message}");
        }

        Event::Unknown => {
            debug!("ignoring unknown event discriminator");
        }
    }

    (next, effects)
}

/// Apply a typing-indicator expiry scheduled by a prior `typing_start`
/// (§5 "Cancellation"). A no-op if a fresher `typing_start` for the same
/// (channel, nickname) has since bumped the generation counter.
pub fn expire_typing(store: &Store, key: &ChannelKey, nickname: &str, generation: u64) -> Store {
    let generation_key = (key.clone(), nickname.to_owned());
    if store.typing_generation.get(&generation_key) != Some(&generation) {
        return store.clone();
    }
    let mut next = store.clone();
    if let Some(list) = next.typing_users.get(key) {
        let mut list = (**list).clone();
        list.retain(|n| n != nickname);
        next.typing_users.insert(key.clone(), Arc::new(list));
    }
    next.typing_generation.remove(&generation_key);
    next
}

fn messages_in(store: &Store, key: &ChannelKey) -> Arc<Vec<crate::model::wire::Message>> {
    store
        .messages
        .get(key)
        .cloned()
        .unwrap_or_else(super::empty_messages)
}

fn members_in(store: &Store, key: &ChannelKey) -> Arc<Vec<crate::model::wire::Member>> {
    store
        .members
        .get(key)
        .cloned()
        .unwrap_or_else(super::empty_members)
}

fn typing_users_in(store: &Store, key: &ChannelKey) -> Arc<Vec<String>> {
    store
        .typing_users
        .get(key)
        .cloned()
        .unwrap_or_else(super::empty_typing_users)
}

/// Run `f` over every message in every channel, replacing only the lists it
/// actually touched so untouched channelKeys keep their `Arc` identity.
fn edit_messages(store: &mut Store, mut f: impl FnMut(&mut crate::model::wire::Message) -> bool) {
    let keys: Vec<_> = store.messages.keys().cloned().collect();
    for key in keys {
        let list = store.messages[&key].clone();
        let mut touched = false;
        let mut owned = None;
        for (index, message) in list.iter().enumerate() {
            let mut candidate = message.clone();
            if f(&mut candidate) {
                touched = true;
                let owned_list = owned.get_or_insert_with(|| (*list).clone());
                owned_list[index] = candidate;
            }
        }
        if touched {
            store.messages.insert(key, Arc::new(owned.unwrap()));
        }
    }
}

fn retain_messages(store: &mut Store, predicate: impl Fn(&crate::model::wire::Message) -> bool) {
    let keys: Vec<_> = store.messages.keys().cloned().collect();
    for key in keys {
        let list = store.messages[&key].clone();
        if list.iter().all(|m| predicate(m)) {
            continue;
        }
        let mut owned = (*list).clone();
        owned.retain(|m| predicate(m));
        store.messages.insert(key, Arc::new(owned));
    }
}

fn patch_channel(
    store: &mut Store,
    server_id: &crate::model::ids::ServerId,
    channel: &str,
    patch: impl FnOnce(&mut crate::model::wire::Channel),
) {
    if let Some(list) = store.channels.get(server_id) {
        if let Some(index) = list.iter().position(|c| c.name == channel) {
            let mut owned = (**list).clone();
            patch(&mut owned[index]);
            store.channels.insert(server_id.clone(), Arc::new(owned));
        }
    }
}

fn owning_server_of_channel(
    store: &Store,
    channel_id: &crate::model::ids::ChannelId,
) -> Option<crate::model::ids::ServerId> {
    store.channels.iter().find_map(|(server_id, list)| {
        list.iter()
            .any(|c| &c.id == channel_id)
            .then(|| server_id.clone())
    })
}

fn remove_member_from_server(
    store: &mut Store,
    server_id: &crate::model::ids::ServerId,
    user_id: &crate::model::ids::UserId,
) {
    let prefix = format!("{}:", server_id);
    let keys: Vec<_> = store
        .members
        .keys()
        .filter(|k| k.as_str().starts_with(&prefix))
        .cloned()
        .collect();
    for key in keys {
        let list = store.members[&key].clone();
        let mut owned = (*list).clone();
        owned.retain(|m| m.user_id.as_ref() != Some(user_id));
        store.members.insert(key, Arc::new(owned));
    }
}

fn parse_status(raw: &str) -> crate::model::wire::OnlineStatus {
    use crate::model::wire::OnlineStatus::*;
    match raw {
        "online" => Online,
        "idle" => Idle,
        "dnd" => Dnd,
        "invisible" => Invisible,
        _ => Offline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::{MessageId, ServerId, UserId};

    fn server() -> ServerId {
        ServerId::from("srv1")
    }

    fn message_event(from: &str, content: &str, id: &str) -> Event {
        Event::Message {
            server_id: Some(server()),
            target: "g".into(),
            from: from.into(),
            id: MessageId::from(id),
            content: content.into(),
            timestamp: chrono::Utc::now(),
            avatar_url: None,
            reply_to_id: None,
            attachment_ids: None,
        }
    }

    #[test]
    fn unread_increments_for_others_only() {
        let mut store = Store::default();
        store.nickname = Some("alice".into());

        let (next, _) = apply(&store, &message_event("bob", "yo", "m1"));
        let key = ChannelKey::new(&server(), "g");
        assert_eq!(*next.unread_counts.get(&key).unwrap(), 1);
        assert_eq!(next.messages[&key].len(), 1);

        let (next2, _) = apply(&next, &message_event("alice", "hi", "m2"));
        assert_eq!(*next2.unread_counts.get(&key).unwrap(), 1);
        assert_eq!(next2.messages[&key].len(), 2);
    }

    #[test]
    fn unread_counts_sync_treats_zero_as_key_absence() {
        let mut store = Store::default();
        let key = ChannelKey::new(&server(), "g");
        store.unread_counts.insert(key.clone(), 3);

        let mut counts = std::collections::HashMap::new();
        counts.insert(key.as_str().to_owned(), 0u64);
        let (next, _) = apply(&store, &Event::UnreadCounts { counts });

        assert_eq!(
            next.unread_counts.get(&key),
            None,
            "a synced zero count must remove the key, not store a literal 0"
        );
    }

    #[test]
    fn reaction_lifecycle() {
        let mut store = Store::default();
        let key = ChannelKey::new(&server(), "g");
        store.messages.insert(
            key.clone(),
            Arc::new(vec![crate::model::wire::Message {
                id: MessageId::from("m1"),
                author: "bob".into(),
                content: "hi".into(),
                timestamp: chrono::Utc::now(),
                edited_at: None,
                reply_to: None,
                reactions: Vec::new(),
                attachments: Vec::new(),
                embeds: Vec::new(),
            }]),
        );

        let add = |s: &Store, user: &str| {
            apply(
                s,
                &Event::ReactionAdd {
                    message_id: MessageId::from("m1"),
                    emoji: "👍".into(),
                    user_id: UserId::from(user),
                },
            )
            .0
        };
        let remove = |s: &Store, user: &str| {
            apply(
                s,
                &Event::ReactionRemove {
                    message_id: MessageId::from("m1"),
                    emoji: "👍".into(),
                    user_id: UserId::from(user),
                },
            )
            .0
        };

        let s1 = add(&store, "u1");
        assert_eq!(s1.messages[&key][0].reactions[0].count, 1);
        let s2 = add(&s1, "u2");
        assert_eq!(s2.messages[&key][0].reactions[0].count, 2);
        let s3 = remove(&s2, "u1");
        assert_eq!(s3.messages[&key][0].reactions[0].count, 1);
        let s4 = remove(&s3, "u2");
        assert!(s4.messages[&key][0].reactions.is_empty());
    }

    #[test]
    fn history_prepend_reverses_order() {
        let mut store = Store::default();
        let key = ChannelKey::new(&server(), "g");
        let make = |id: &str| crate::model::wire::Message {
            id: MessageId::from(id),
            author: "bob".into(),
            content: id.into(),
            timestamp: chrono::Utc::now(),
            edited_at: None,
            reply_to: None,
            reactions: Vec::new(),
            attachments: Vec::new(),
            embeds: Vec::new(),
        };
        store
            .messages
            .insert(key.clone(), Arc::new(vec![make("m3"), make("m4")]));

        let (next, _) = apply(
            &store,
            &Event::History {
                server_id: server(),
                channel: "g".into(),
                messages: vec![make("m2"), make("m1")],
                has_more: true,
            },
        );

        let ids: Vec<_> = next.messages[&key].iter().map(|m| m.id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3", "m4"]);
        assert!(*next.has_more.get(&key).unwrap());
    }

    #[test]
    fn names_is_idempotent() {
        let store = Store::default();
        let event = Event::Names {
            server_id: server(),
            channel: "g".into(),
            members: vec![crate::model::event::MemberEntry {
                nickname: "bob".into(),
                avatar_url: None,
                user_id: None,
            }],
        };
        let (once, _) = apply(&store, &event);
        let (twice, _) = apply(&once, &event);
        let key = ChannelKey::new(&server(), "g");
        assert_eq!(twice.members[&key].len(), once.members[&key].len());
    }

    #[test]
    fn join_is_idempotent_by_nickname() {
        let store = Store::default();
        let event = Event::Join {
            server_id: server(),
            channel: "g".into(),
            member: crate::model::event::MemberEntry {
                nickname: "bob".into(),
                avatar_url: None,
                user_id: None,
            },
        };
        let (once, _) = apply(&store, &event);
        let (twice, _) = apply(&once, &event);
        let key = ChannelKey::new(&server(), "g");
        assert_eq!(twice.members[&key].len(), 1);
    }

    #[test]
    fn quit_after_quit_is_a_noop() {
        let mut store = Store::default();
        let key = ChannelKey::new(&server(), "g");
        store.members.insert(
            key.clone(),
            Arc::new(vec![crate::model::wire::Member {
                nickname: "bob".into(),
                avatar_url: None,
                user_id: None,
                status: None,
                custom_status: None,
                status_emoji: None,
            }]),
        );
        let (once, _) = apply(&store, &Event::Quit { nickname: "bob".into() });
        let (twice, _) = apply(&once, &Event::Quit { nickname: "bob".into() });
        assert_eq!(once.members[&key].len(), 0);
        assert_eq!(twice.members[&key].len(), 0);
    }

    #[test]
    fn untouched_channel_keeps_identity() {
        let mut store = Store::default();
        let untouched_key = ChannelKey::new(&server(), "other");
        store
            .messages
            .insert(untouched_key.clone(), super::super::empty_messages());

        let (next, _) = apply(&store, &message_event("bob", "hi", "m1"));

        assert!(Arc::ptr_eq(
            &store.messages[&untouched_key],
            &next.messages[&untouched_key]
        ));
    }

    #[test]
    fn channel_list_primes_roles_categories_presences_in_order() {
        let store = Store::default();
        let (_, effects) = apply(
            &store,
            &Event::ChannelList {
                server_id: server(),
                channels: Vec::new(),
            },
        );
        let sent: Vec<_> = effects
            .into_iter()
            .map(|e| match e {
                Effect::Send(cmd) => cmd,
                other => panic!("unexpected effect {other:?}"),
            })
            .collect();
        assert!(matches!(sent[0], Command::ListRoles { .. }));
        assert!(matches!(sent[1], Command::ListCategories { .. }));
        assert!(matches!(sent[2], Command::GetPresences { .. }));
    }

    proptest::proptest! {
        /// Property 1: whatever sequence of reaction add/remove events fold
        /// through the reducer, every surviving reaction group satisfies
        /// `count == user_ids.len() > 0`.
        #[test]
        fn reaction_group_count_always_matches_user_ids(
            ops in proptest::collection::vec(
                (proptest::bool::ANY, 0u8..4u8),
                0..30,
            ),
        ) {
            let mut store = Store::default();
            let key = ChannelKey::new(&server(), "g");
            store.messages.insert(
                key.clone(),
                Arc::new(vec![crate::model::wire::Message {
                    id: MessageId::from("m1"),
                    author: "bob".into(),
                    content: "hi".into(),
                    timestamp: chrono::Utc::now(),
                    edited_at: None,
                    reply_to: None,
                    reactions: Vec::new(),
                    attachments: Vec::new(),
                    embeds: Vec::new(),
                }]),
            );

            for (is_add, user) in ops {
                let user_id = UserId::from(format!("u{user}"));
                let event = if is_add {
                    Event::ReactionAdd {
                        message_id: MessageId::from("m1"),
                        emoji: "👍".into(),
                        user_id,
                    }
                } else {
                    Event::ReactionRemove {
                        message_id: MessageId::from("m1"),
                        emoji: "👍".into(),
                        user_id,
                    }
                };
                store = apply(&store, &event).0;
            }

            for group in &store.messages[&key][0].reactions {
                proptest::prop_assert_eq!(group.count, group.user_ids.len());
                proptest::prop_assert!(group.count > 0);
            }
        }

        /// Property 5: a reducer never replaces the `Arc` behind a map key
        /// it did not touch, for any event targeting a different channel.
        #[test]
        fn untouched_channel_identity_holds_for_any_other_message(
            other_channel in "[a-z]{1,8}",
            from in "[a-z]{1,8}",
            content in ".{0,20}",
            id in "[a-z0-9]{1,8}",
        ) {
            proptest::prop_assume!(other_channel != "g");

            let mut store = Store::default();
            let untouched_key = ChannelKey::new(&server(), "g");
            store.messages.insert(untouched_key.clone(), super::super::empty_messages());

            let (next, _) = apply(
                &store,
                &Event::Message {
                    server_id: Some(server()),
                    target: other_channel,
                    from,
                    id: MessageId::from(id),
                    content,
                    timestamp: chrono::Utc::now(),
                    avatar_url: None,
                    reply_to_id: None,
                    attachment_ids: None,
                },
            );

            proptest::prop_assert!(Arc::ptr_eq(
                &store.messages[&untouched_key],
                &next.messages[&untouched_key]
            ));
        }
    }
}

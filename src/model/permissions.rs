//! The role permission bitfield and the channel type enumeration.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

bitflags! {
    /// Set of permissions assignable to a [`crate::model::wire::Role`].
    ///
    /// A 64-bit mask per §3/§GLOSSARY ("Permission bitfield"): `ADMINISTRATOR`
    /// short-circuits to grant everything; otherwise a permission is held iff
    /// its bit is set on some role the member carries.
    #[derive(Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Permissions: u64 {
        const CREATE_INVITE      = 1;
        const KICK_MEMBERS       = 1 << 1;
        const BAN_MEMBERS        = 1 << 2;
        /// Grant all permissions, bypassing every other check.
        const ADMINISTRATOR      = 1 << 3;
        const MANAGE_CHANNELS    = 1 << 4;
        const MANAGE_SERVER      = 1 << 5;
        const ADD_REACTIONS      = 1 << 6;
        const VIEW_AUDIT_LOG     = 1 << 7;
        const MANAGE_EVENTS      = 1 << 8;
        const CREATE_THREADS     = 1 << 9;
        const READ_MESSAGES      = 1 << 10;
        const SEND_MESSAGES      = 1 << 11;
        const MANAGE_THREADS     = 1 << 12;
        const MANAGE_MESSAGES    = 1 << 13;
        const EMBED_LINKS        = 1 << 14;
        const ATTACH_FILES       = 1 << 15;
        const READ_HISTORY       = 1 << 16;
        const MENTION_EVERYONE   = 1 << 17;
        const EXTERNAL_EMOJIS    = 1 << 18;
        const MODERATE_MEMBERS   = 1 << 19;
        const MANAGE_AUTOMOD     = 1 << 20;
        const MANAGE_EMOJIS      = 1 << 21;
        const MANAGE_WEBHOOKS    = 1 << 22;
        const MANAGE_NICKNAMES   = 1 << 23;
        const CHANGE_NICKNAME    = 1 << 24;
        const MANAGE_ROLES       = 1 << 25;
    }
}

impl Permissions {
    /// Fold a set of role masks into one effective mask, honoring the
    /// `ADMINISTRATOR` shortcut.
    ///
    /// The owner of a server always has every permission regardless of role
    /// assignment; callers should check ownership before falling back to
    /// this. Channel-specific overwrites are outside this crate's data model
    /// (§3 does not carry `PermissionOverwrite` on `Channel`) and are the
    /// host application's concern if it needs them.
    pub fn resolve<'a>(roles: impl IntoIterator<Item = &'a Permissions>) -> Permissions {
        let mut acc = Permissions::empty();
        for role in roles {
            acc |= *role;
        }
        if acc.contains(Permissions::ADMINISTRATOR) {
            return Permissions::all();
        }
        acc
    }

    /// Permissions for a server's owner: always everything.
    pub fn for_owner() -> Permissions {
        Permissions::all()
    }
}

/// Whether a permission check subject is the server owner.
pub fn is_owner(owner_id: &UserId, candidate: &UserId) -> bool {
    owner_id == candidate
}

/// `channel_type` discriminator for [`crate::model::wire::Channel`] (§3).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Text,
    Voice,
    PublicThread,
    PrivateThread,
    Forum,
    Announcement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_grants_everything() {
        let resolved = Permissions::resolve([&Permissions::ADMINISTRATOR]);
        assert_eq!(resolved, Permissions::all());
    }

    #[test]
    fn roles_or_together() {
        let a = Permissions::SEND_MESSAGES;
        let b = Permissions::READ_MESSAGES;
        let resolved = Permissions::resolve([&a, &b]);
        assert!(resolved.contains(Permissions::SEND_MESSAGES));
        assert!(resolved.contains(Permissions::READ_MESSAGES));
        assert!(!resolved.contains(Permissions::BAN_MEMBERS));
    }
}

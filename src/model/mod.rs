//! Struct and enum definitions of values in the Concord model.

pub mod command;
pub mod event;
pub mod ids;
pub mod permissions;
pub mod wire;

pub use command::Command;
pub use event::Event;
pub use ids::{
    AttachmentId, AuditEntryId, AutomodRuleId, BookmarkId, CategoryId, ChannelId, ChannelKey,
    EventId, ForumTagId, InviteId, MessageId, RoleId, ServerId, TemplateId, UserId,
};
pub use permissions::{ChannelType, Permissions};

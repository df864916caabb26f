//! UI Intent Store: ephemeral navigation/panel state plus server-folder
//! persistence (§4.5).
//!
//! Lives outside [`crate::store::Store`] entirely, which is why
//! `disconnect()` never touches it (§3 lifecycle, scenario S6): this struct
//! only ever changes in response to local UI intents, never server events.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::ids::{CategoryId, ChannelId, ServerId};
use crate::model::wire::Folder;
use crate::Result;

/// Ephemeral navigation and panel-visibility state, plus the one thing in
/// the CSE that is actually persisted (`server_folders`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UiState {
    /// Which server this applies to.
    pub active_server: Option<ServerId>,
    /// Which channel is currently selected within the active server.
    pub active_channel: Option<ChannelId>,
    /// Whether the member list panel is visible.
    pub show_member_list: bool,
    /// Whether the user settings panel is visible.
    pub show_settings: bool,
    /// Whether the server settings panel is visible.
    pub show_server_settings: bool,
    /// Which categories are collapsed in the channel sidebar.
    pub collapsed_categories: HashMap<CategoryId, bool>,
    /// Client-local server folders (§6.5, the one persisted field).
    pub server_folders: Vec<Folder>,
    /// Whether the search panel is visible.
    pub show_search: bool,
    /// Nickname whose profile panel is visible, if any.
    pub show_user_profile: Option<String>,
    /// Whether the quick-switcher is visible.
    pub show_quick_switcher: bool,
    /// Whether the pinned-messages panel is visible.
    pub show_pinned_messages: bool,
    /// Whether the thread panel is visible.
    pub show_thread_panel: bool,
    /// Which thread the thread panel is showing, if any.
    pub active_thread_id: Option<ChannelId>,
    /// Whether the bookmarks panel is visible.
    pub show_bookmarks: bool,
    /// Whether the moderation panel is visible.
    pub show_moderation_panel: bool,
    /// Whether the community settings panel is visible.
    pub show_community_panel: bool,
}

impl UiState {
    /// `setActiveServer` also clears `activeChannel` (§4.5 rule).
    pub fn set_active_server(&mut self, server_id: Option<ServerId>) {
        self.active_server = server_id;
        self.active_channel = None;
    }

    /// `setActiveThreadId` also flips `showThreadPanel` (§4.5 rule).
    pub fn set_active_thread_id(&mut self, thread_id: Option<ChannelId>) {
        self.show_thread_panel = thread_id.is_some();
        self.active_thread_id = thread_id;
    }
}

/// Durable storage for the one thing the CSE persists: server folders
/// (§6.5). Abstracted behind a trait so tests can swap in an in-memory
/// double instead of touching the filesystem.
pub trait FolderStore: Send + Sync {
    fn load(&self) -> Vec<Folder>;
    fn save(&self, folders: &[Folder]);
}

/// JSON-file-backed [`FolderStore`], rooted at the platform data directory
/// (§6.5 "ambient config-directory convention").
pub struct JsonFileFolderStore {
    path: PathBuf,
}

impl JsonFileFolderStore {
    /// `dirs::data_dir()/concord/server-folders.json`, or the given
    /// directory joined the same way if `base` is provided (mainly for
    /// tests).
    pub fn new(base: Option<&Path>) -> Self {
        let root = base
            .map(Path::to_path_buf)
            .or_else(dirs::data_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("concord");
        JsonFileFolderStore {
            path: root.join("server-folders.json"),
        }
    }

    fn load_inner(&self) -> Result<Vec<Folder>> {
        let content = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    fn save_inner(&self, folders: &[Folder]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_vec_pretty(folders)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl FolderStore for JsonFileFolderStore {
    /// Parse/IO failures fall back to an empty list (§6.5, §7 "Storage
    /// failure: swallow; in-memory state remains authoritative").
    fn load(&self) -> Vec<Folder> {
        self.load_inner().unwrap_or_else(|err| {
            warn!("could not load server folders, starting empty: {err}");
            Vec::new()
        })
    }

    fn save(&self, folders: &[Folder]) {
        if let Err(err) = self.save_inner(folders) {
            warn!("could not persist server folders: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_active_server_clears_active_channel() {
        let mut ui = UiState::default();
        ui.active_channel = Some(ChannelId::from("c1"));
        ui.set_active_server(Some(ServerId::from("s1")));
        assert_eq!(ui.active_channel, None);
    }

    #[test]
    fn set_active_thread_id_toggles_panel() {
        let mut ui = UiState::default();
        ui.set_active_thread_id(Some(ChannelId::from("t1")));
        assert!(ui.show_thread_panel);
        ui.set_active_thread_id(None);
        assert!(!ui.show_thread_panel);
    }

    #[test]
    fn folder_store_round_trips_through_a_temp_dir() {
        let dir = std::env::temp_dir().join(format!("concord-test-{}", uuid::Uuid::new_v4()));
        let store = JsonFileFolderStore::new(Some(&dir));

        assert!(store.load().is_empty());

        let folders = vec![Folder {
            id: "f1".into(),
            name: "Friends".into(),
            server_ids: vec![ServerId::from("s1")],
            collapsed: false,
        }];
        store.save(&folders);

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Friends");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn folder_store_tolerates_missing_file() {
        let dir = std::env::temp_dir().join(format!("concord-test-missing-{}", uuid::Uuid::new_v4()));
        let store = JsonFileFolderStore::new(Some(&dir));
        assert!(store.load().is_empty());
    }
}

//! Two-phase editing of dynamic mode settings
//!
//! Edits go to a pending copy and only reach the controller on `apply`.

use super::config::PartyConfig;
use super::controller::PartyController;
use crate::model::CollectionQuery;
use crate::playlist::PlaylistStore;

#[derive(Debug, Clone)]
pub struct PartySettings {
    applied: PartyConfig,
    pending: PartyConfig,
}

impl PartySettings {
    pub fn new(config: PartyConfig) -> Self {
        Self {
            pending: config.clone(),
            applied: config,
        }
    }

    /// The configuration currently in effect
    pub fn applied(&self) -> &PartyConfig {
        &self.applied
    }

    pub fn pending(&self) -> &PartyConfig {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PartyConfig {
        &mut self.pending
    }

    /// Pending edits differ from the applied configuration
    pub fn is_dirty(&self) -> bool {
        self.pending != self.applied
    }

    /// Throw pending edits away
    pub fn discard(&mut self) {
        self.pending = self.applied.clone();
    }

    /// Commit pending edits to the controller.
    ///
    /// Returns true when the controller accepted them.
    pub fn apply(
        &mut self,
        controller: &mut PartyController,
        store: &mut PlaylistStore,
        collection: &dyn CollectionQuery,
    ) -> bool {
        if !self.is_dirty() {
            return false;
        }
        if controller.apply_config(store, collection, self.pending.clone()) {
            log::info!("dynamic mode settings applied");
            self.applied = self.pending.clone();
            true
        } else {
            false
        }
    }

    /// Replace all settings with a saved preset, apply it and repopulate
    pub fn load_preset(
        &mut self,
        preset: PartyConfig,
        controller: &mut PartyController,
        store: &mut PlaylistStore,
        collection: &dyn CollectionQuery,
    ) -> bool {
        self.pending = preset;
        let applied = self.apply(controller, store, collection);
        controller.repopulate(store, collection);
        applied
    }
}

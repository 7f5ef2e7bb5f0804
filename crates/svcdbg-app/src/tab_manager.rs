//! Manages the open invocation tabs

use std::collections::HashMap;

use svcdbg_core::prelude::*;

use crate::session::{InvocationSession, TabId};

/// Ordered set of open tabs with one selected
#[derive(Debug, Default)]
pub struct TabManager {
    /// All sessions indexed by tab ID
    tabs: HashMap<TabId, InvocationSession>,

    /// Order of tab IDs (for the tab bar)
    order: Vec<TabId>,

    /// Currently selected tab
    selected_index: usize,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session as the last tab and select it
    pub fn open(&mut self, session: InvocationSession) -> TabId {
        let id = session.id;
        info!("Opening tab {} for {}", id, session.module);
        self.tabs.insert(id, session);
        self.order.push(id);
        self.selected_index = self.order.len() - 1;
        id
    }

    /// Close a tab. If it was selected, its left neighbour becomes selected (the new
    /// first tab when the leftmost was closed).
    pub fn close(&mut self, id: TabId) -> Option<InvocationSession> {
        let pos = self.order.iter().position(|&t| t == id)?;
        self.order.remove(pos);
        if pos < self.selected_index || (pos == self.selected_index && pos > 0) {
            self.selected_index -= 1;
        }
        self.selected_index = self.selected_index.min(self.order.len().saturating_sub(1));
        debug!("Closed tab {}", id);
        self.tabs.remove(&id)
    }

    pub fn close_all(&mut self) {
        self.tabs.clear();
        self.order.clear();
        self.selected_index = 0;
    }

    /// Close every tab except `id`
    pub fn close_others(&mut self, id: TabId) {
        if !self.tabs.contains_key(&id) {
            return;
        }
        self.tabs.retain(|&t, _| t == id);
        self.order.retain(|&t| t == id);
        self.selected_index = 0;
    }

    pub fn get(&self, id: TabId) -> Option<&InvocationSession> {
        self.tabs.get(&id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut InvocationSession> {
        self.tabs.get_mut(&id)
    }

    pub fn selected(&self) -> Option<&InvocationSession> {
        self.order
            .get(self.selected_index)
            .and_then(|id| self.tabs.get(id))
    }

    pub fn selected_mut(&mut self) -> Option<&mut InvocationSession> {
        let id = self.order.get(self.selected_index).copied();
        id.and_then(move |id| self.tabs.get_mut(&id))
    }

    pub fn selected_id(&self) -> Option<TabId> {
        self.order.get(self.selected_index).copied()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Select tab by index (0-based)
    pub fn select_by_index(&mut self, index: usize) -> bool {
        if index < self.order.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// Select next tab (wraps around)
    pub fn select_next(&mut self) {
        if !self.order.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.order.len();
        }
    }

    /// Select previous tab (wraps around)
    pub fn select_previous(&mut self) {
        if !self.order.is_empty() {
            self.selected_index = if self.selected_index == 0 {
                self.order.len() - 1
            } else {
                self.selected_index - 1
            };
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over all tabs in order
    pub fn iter(&self) -> impl Iterator<Item = &InvocationSession> {
        self.order.iter().filter_map(|id| self.tabs.get(id))
    }

    /// Tab IDs in order
    pub fn ids(&self) -> Vec<TabId> {
        self.order.clone()
    }

    /// Tab titles for display
    pub fn tab_titles(&self) -> Vec<String> {
        self.iter().map(InvocationSession::title).collect()
    }
}

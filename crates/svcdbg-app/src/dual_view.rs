//! Structured/text view synchronisation for the request editor
//!
//! Structured → text is total: switching re-serializes the current tree. Text →
//! structured happens only on an explicit commit, which either replaces the tree
//! atomically or records a [`SyncParseError`] and leaves the tree alone.

use svcdbg_core::{validate, SchemaRegistry, SyncParseError, Value};

use crate::text_buffer::{TextBuffer, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestView {
    #[default]
    Structured,
    Text,
}

#[derive(Debug, Clone, Default)]
pub struct DualView {
    view: RequestView,
    /// Present only while the text view is shown
    buffer: Option<TextBuffer>,
    error: Option<SyncParseError>,
    /// Text edited since the last sync
    dirty: bool,
}

impl DualView {
    pub fn view(&self) -> RequestView {
        self.view
    }

    pub fn is_text(&self) -> bool {
        self.view == RequestView::Text
    }

    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.buffer.as_ref()
    }

    pub fn error(&self) -> Option<&SyncParseError> {
        self.error.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn show_text(&mut self, value: &Value) {
        self.view = RequestView::Text;
        self.resync(value);
    }

    /// Back to widgets. Uncommitted text is dropped; the tree was never touched.
    pub fn show_structured(&mut self) {
        self.view = RequestView::Structured;
        self.buffer = None;
        self.error = None;
        self.dirty = false;
    }

    pub fn toggle(&mut self, value: &Value) {
        match self.view {
            RequestView::Structured => self.show_text(value),
            RequestView::Text => self.show_structured(),
        }
    }

    /// Called after the tree changed by any other route.
    pub fn invalidate(&mut self, value: &Value) {
        if self.is_text() {
            self.resync(value);
        } else {
            self.buffer = None;
        }
    }

    fn resync(&mut self, value: &Value) {
        let mut buffer = TextBuffer::new(&value.to_pretty_text());
        buffer.move_to_start();
        self.buffer = Some(buffer);
        self.error = None;
        self.dirty = false;
    }

    pub fn edit(&mut self, edit: TextEdit) {
        if let Some(buffer) = self.buffer.as_mut() {
            if buffer.apply(edit) {
                self.dirty = true;
            }
        }
    }

    /// Parse the text and check it against `root_type`.
    ///
    /// On success the text is rewritten in canonical form and the new tree is
    /// returned for the caller to install.
    pub fn commit(
        &mut self,
        registry: &SchemaRegistry,
        root_type: &str,
    ) -> Result<Value, SyncParseError> {
        let text = self.buffer.as_ref().map(TextBuffer::text).unwrap_or_default();
        let parsed = serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| SyncParseError::syntax(e.to_string()))
            .map(Value::from)
            .and_then(|value| validate::conform(registry, root_type, &value).map(|()| value));

        match parsed {
            Ok(value) => {
                self.resync(&value);
                Ok(value)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

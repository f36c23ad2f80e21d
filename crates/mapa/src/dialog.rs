//! Modal label editor.

use mapa_core::NodeKind;

/// Display name of a node kind in the dialog title.
pub fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Root => "Tema Central",
        NodeKind::Category => "Categoria",
        NodeKind::Item => "Item",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        node_id: String,
        kind: NodeKind,
        initial: String,
        draft: String,
    },
}

/// Emitted when the user confirms an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub node_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditDialog {
    state: DialogState,
}

impl EditDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or re-targets) the dialog. The draft always starts from `label`, even when the
    /// dialog was already open for the same node.
    pub fn open(&mut self, node_id: impl Into<String>, label: impl Into<String>, kind: NodeKind) {
        let label = label.into();
        self.state = DialogState::Open {
            node_id: node_id.into(),
            kind,
            draft: label.clone(),
            initial: label,
        };
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    pub fn node_id(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open { node_id, .. } => Some(node_id),
            DialogState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open { draft, .. } => Some(draft),
            DialogState::Closed => None,
        }
    }

    /// "Editar {kind label}" while open.
    pub fn title(&self) -> Option<String> {
        match &self.state {
            DialogState::Open { kind, .. } => Some(format!("Editar {}", kind_label(*kind))),
            DialogState::Closed => None,
        }
    }

    /// Replaces the draft. Ignored (returns false) while closed.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            DialogState::Open { draft, .. } => {
                *draft = text.into();
                true
            }
            DialogState::Closed => false,
        }
    }

    /// Closes without emitting anything.
    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Closes and emits the draft for the edited node. `None` when the dialog was closed.
    pub fn save(&mut self) -> Option<SaveRequest> {
        match std::mem::take(&mut self.state) {
            DialogState::Open { node_id, draft, .. } => Some(SaveRequest {
                node_id,
                text: draft,
            }),
            DialogState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_and_title() {
        assert_eq!(kind_label(NodeKind::Root), "Tema Central");
        assert_eq!(kind_label(NodeKind::Category), "Categoria");
        assert_eq!(kind_label(NodeKind::Item), "Item");

        let mut dialog = EditDialog::new();
        assert_eq!(dialog.title(), None);
        dialog.open("nicho", "Definição de Nicho", NodeKind::Category);
        assert_eq!(dialog.title().as_deref(), Some("Editar Categoria"));
    }

    #[test]
    fn save_emits_the_draft_and_closes() {
        let mut dialog = EditDialog::new();
        dialog.open("n1", "Old", NodeKind::Item);
        assert!(dialog.set_draft("New"));
        assert_eq!(
            dialog.save(),
            Some(SaveRequest {
                node_id: "n1".to_string(),
                text: "New".to_string(),
            })
        );
        assert!(!dialog.is_open());
        assert_eq!(dialog.save(), None);
    }

    #[test]
    fn cancel_discards_and_reopen_resets_the_draft() {
        let mut dialog = EditDialog::new();
        dialog.open("n1", "Old", NodeKind::Item);
        dialog.set_draft("typed but abandoned");
        dialog.cancel();
        assert_eq!(dialog.state(), &DialogState::Closed);
        assert!(!dialog.set_draft("ignored"));

        dialog.open("n1", "Old", NodeKind::Item);
        assert_eq!(dialog.draft(), Some("Old"));

        dialog.set_draft("x");
        dialog.open("n1", "Old", NodeKind::Item);
        assert_eq!(dialog.draft(), Some("Old"));
        assert_eq!(dialog.node_id(), Some("n1"));
    }
}

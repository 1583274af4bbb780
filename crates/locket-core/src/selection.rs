use crate::game::{GameDescriptor, GameId};
use crate::manifest::Manifest;

/// Result of resolving the current selection against a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus<'m> {
    /// No game has been chosen yet in this session.
    Nothing,
    Selected(&'m GameDescriptor),
    /// A game was chosen but its id is not in the manifest (it may have
    /// been reloaded since).
    NotFound(&'m GameId),
}

/// The game chosen in one session. Set by explicit user action and never
/// cleared; reading it before anything is chosen is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<GameId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: GameId) {
        tracing::debug!(game = %id, "Game selected");
        self.current = Some(id);
    }

    pub fn selected_id(&self) -> Option<&GameId> {
        self.current.as_ref()
    }

    pub fn resolve<'m>(&'m self, manifest: &'m Manifest) -> SelectionStatus<'m> {
        match &self.current {
            None => SelectionStatus::Nothing,
            Some(id) => match manifest.get(id) {
                Some(game) => SelectionStatus::Selected(game),
                None => SelectionStatus::NotFound(id),
            },
        }
    }

    /// The selected descriptor, or `None` if unset or no longer in `manifest`.
    pub fn current<'m>(&self, manifest: &'m Manifest) -> Option<&'m GameDescriptor> {
        self.current.as_ref().and_then(|id| manifest.get(id))
    }
}

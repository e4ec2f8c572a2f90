/// Which record, if any, is being edited inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSession<I, D> {
    Idle,
    Editing { target: I, draft: D },
}

impl<I, D> Default for EditSession<I, D> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<I: PartialEq, D> EditSession<I, D> {
    /// Starts editing `target`, discarding any session already in progress.
    pub fn begin(&mut self, target: I, draft: D) {
        *self = Self::Editing { target, draft };
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_editing(&self, id: &I) -> bool {
        matches!(self, Self::Editing { target, .. } if target == id)
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_overwrites_without_merging() {
        let mut session: EditSession<u32, String> = EditSession::default();
        session.begin(1, "first draft".to_string());
        if let Some(draft) = session.draft_mut() {
            draft.push_str(" edited");
        }
        session.begin(2, "second".to_string());

        assert!(session.is_editing(&2));
        assert!(!session.is_editing(&1));
        assert_eq!(session.draft().map(String::as_str), Some("second"));
    }

    #[test]
    fn idle_session_has_no_draft_to_mutate() {
        let mut session: EditSession<u32, String> = EditSession::Idle;
        assert!(session.draft_mut().is_none());
        session.cancel();
        assert!(session.is_idle());
    }
}

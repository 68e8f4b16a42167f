//! The message list and keyboard selection.

use crate::core::MessageEntry;

/// Direction of a keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Towards older messages (down the list).
    Next,
    /// Towards newer messages (up the list).
    Previous,
}

/// Rows of the last message list response plus the active row.
///
/// The active row follows the selected message by UUID, so a reload keeps
/// it highlighted as long as the message is still listed.
#[derive(Debug, Clone, Default)]
pub struct MessageList {
    rows: Vec<MessageEntry>,
    active: Option<usize>,
}

impl MessageList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            active: None,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the highlighted row.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Replaces the rows and re-highlights `selected` if it is listed.
    pub fn replace(&mut self, rows: Vec<MessageEntry>, selected: Option<&str>) {
        self.rows = rows;
        self.active = selected.and_then(|uuid| self.position(uuid));
    }

    /// Highlights the row of `uuid`, or nothing if it is not listed.
    pub fn activate(&mut self, uuid: &str) -> Option<usize> {
        self.active = self.position(uuid);
        self.active
    }

    /// Row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MessageEntry> {
        self.rows.get(index)
    }

    /// The row a keyboard step lands on.
    ///
    /// Without a highlighted row, down picks the first row and up the last.
    /// Stepping past either end yields `None`.
    #[must_use]
    pub fn step_target(&self, step: Step) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        match (self.active, step) {
            (None, Step::Next) => Some(0),
            (None, Step::Previous) => Some(self.rows.len() - 1),
            (Some(index), Step::Next) => Some(index + 1).filter(|&next| next < self.rows.len()),
            (Some(index), Step::Previous) => index.checked_sub(1),
        }
    }

    fn position(&self, uuid: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.uuid == uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::fixtures::entry;

    fn list_of(uuids: &[&str]) -> MessageList {
        let mut list = MessageList::new();
        list.replace(uuids.iter().map(|u| entry(u, "s")).collect(), None);
        list
    }

    #[test]
    fn test_step_without_active_row() {
        let list = list_of(&["a", "b", "c"]);
        assert_eq!(list.step_target(Step::Next), Some(0));
        assert_eq!(list.step_target(Step::Previous), Some(2));
    }

    #[test]
    fn test_step_moves_and_stops_at_ends() {
        let mut list = list_of(&["a", "b", "c"]);
        list.activate("b");
        assert_eq!(list.step_target(Step::Next), Some(2));
        assert_eq!(list.step_target(Step::Previous), Some(0));

        list.activate("c");
        assert_eq!(list.step_target(Step::Next), None);
        list.activate("a");
        assert_eq!(list.step_target(Step::Previous), None);
    }

    #[test]
    fn test_step_on_empty_list() {
        let list = MessageList::new();
        assert!(list.is_empty());
        assert_eq!(list.step_target(Step::Next), None);
        assert_eq!(list.step_target(Step::Previous), None);
    }

    #[test]
    fn test_replace_keeps_selection_by_uuid() {
        let mut list = list_of(&["a", "b"]);
        list.activate("b");

        list.replace(vec![entry("new", "s"), entry("a", "s"), entry("b", "s")], Some("b"));
        assert_eq!(list.active(), Some(2));

        list.replace(vec![entry("x", "s")], Some("b"));
        assert_eq!(list.active(), None);
        assert_eq!(list.len(), 1);
    }
}

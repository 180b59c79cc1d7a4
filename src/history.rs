//! The ledger of past evaluations backing the `ans` token and the
//! history sidebar of the UI.

/// One successful evaluation: the expression as the user typed it and the
/// rendered result. Never mutated once recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

/// Ordered record of successful evaluations, newest first. Lives for one
/// application session; entries are only ever inserted at the front.
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl Default for History {
    fn default() -> History {
        History { entries: Vec::new() }
    }
}

impl History {
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts a new entry at the front of the ledger.
    pub fn record(&mut self, expression: &str, result: &str) {
        self.entries.insert(
            0,
            HistoryEntry {
                expression: expression.to_string(),
                result: result.to_string(),
            },
        );
    }

    /// The result of the most recent successful evaluation, the value
    /// substituted for `ans`. `None` until something has been evaluated.
    pub fn last_answer(&self) -> Option<&str> {
        self.entries.first().map(|e| e.result.as_str())
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

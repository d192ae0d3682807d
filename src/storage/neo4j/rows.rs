//! Rows of a committed query.

use neo4rs::Row;
use std::collections::VecDeque;

/// Result of [`Neo4jAdapter::execute_query`](super::Neo4jAdapter).
///
/// The query runs in its own transaction, which is fully consumed and
/// committed before this value is returned; iterating never touches the
/// server.
#[derive(Default)]
pub struct Neo4jRows {
    rows: VecDeque<Row>,
}

impl Neo4jRows {
    pub(super) fn new(rows: VecDeque<Row>) -> Self {
        Self { rows }
    }

    /// Rows not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when every row has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Iterator for Neo4jRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for Neo4jRows {}

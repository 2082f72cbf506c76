//! Static accident sample exposed for visualization.

use accident_risk_accident_models::AccidentRecord;

/// The accident sample, in the table's stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentFeed {
    records: Vec<AccidentRecord>,
}

impl AccidentFeed {
    /// Wraps records already in stored order.
    #[must_use]
    pub const fn new(records: Vec<AccidentRecord>) -> Self {
        Self { records }
    }

    /// Every record in stored order. Repeated calls return the same
    /// sequence.
    #[must_use]
    pub fn get_all(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the sample has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

use crate::models::expense::ExpenseLine;
use crate::models::record::{InvestmentRecord, ProjectedRecord};

/// Whether a projection should also collect every expense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFlattening {
    /// Concatenate all `spending_details` in input order
    Include,
    /// Leave `expenses` empty
    Skip,
}

/// Output of [`ProjectionService::project`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// One projected record per input record, same order
    pub records: Vec<ProjectedRecord>,
    /// Every expense line of every record (empty when flattening was skipped)
    pub expenses: Vec<ExpenseLine>,
}

/// Strips stored records down to their client-facing fields.
///
/// Pure and permissive: copies whatever is present, substitutes nothing.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    pub fn project(
        &self,
        records: &[InvestmentRecord],
        flattening: ExpenseFlattening,
    ) -> Projection {
        let projected = records.iter().map(ProjectedRecord::from).collect();

        let expenses = match flattening {
            ExpenseFlattening::Include => records
                .iter()
                .flat_map(|r| r.spending_details.iter().cloned())
                .collect(),
            ExpenseFlattening::Skip => Vec::new(),
        };

        Projection {
            records: projected,
            expenses,
        }
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}

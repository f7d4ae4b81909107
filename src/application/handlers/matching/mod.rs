//! Matching query handlers.

mod compute_match;
mod find_matches;
mod get_audit_verdict;

pub use compute_match::{ComputeMatchHandler, ComputeMatchQuery};
pub use find_matches::{FindMatchesHandler, FindMatchesQuery, DEFAULT_MATCH_LIMIT};
pub use get_audit_verdict::{GetAuditVerdictHandler, GetAuditVerdictQuery};

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::DomainError;
use crate::domain::matching::MatchContext;

use super::profile::unknown_categories;

/// Checks caller-supplied filters and maps allow-list entries to table labels.
pub fn validate_context(
    table: &EthicalWeightTable,
    context: MatchContext,
) -> Result<MatchContext, DomainError> {
    if let Some(threshold) = context.min_contribution {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(DomainError::validation(
                "min_contribution",
                "min_contribution must be a non-negative number",
            ));
        }
    }

    let category_allow_list = match context.category_allow_list {
        Some(allowed) => {
            let unknown: Vec<String> = table
                .unknown(allowed.iter())
                .into_iter()
                .map(|c| c.label().to_string())
                .collect();
            if !unknown.is_empty() {
                return Err(unknown_categories(&unknown));
            }
            Some(
                allowed
                    .iter()
                    .filter_map(|c| table.canonical(c).cloned())
                    .collect(),
            )
        }
        None => None,
    };

    Ok(MatchContext {
        min_contribution: context.min_contribution,
        category_allow_list,
    })
}

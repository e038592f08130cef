//! Date resolution, review flagging and de-duplication of scanned rows.

use tracing::warn;

use crate::parsers::layout::profile::LayoutProfile;
use crate::parsers::text::dto::RawTransaction;
use crate::types::{Diagnostic, StatementMetadata, TransactionCollection};

/// Resolves every raw row against `profile` and builds the ordered, de-duplicated
/// collection. Rows whose date cannot be resolved are dropped and recorded in
/// `diagnostics`.
pub fn normalize(
    raw: Vec<RawTransaction>,
    profile: &LayoutProfile,
    metadata: &StatementMetadata,
    diagnostics: &mut Vec<Diagnostic>,
) -> TransactionCollection {
    let mut transactions = Vec::with_capacity(raw.len());

    for row in raw {
        let line_index = row.source_line_index;
        match row.resolve(profile, metadata) {
            Ok(transaction) => {
                if transaction.needs_review {
                    warn!(
                        line = line_index,
                        amount = %transaction.amount,
                        description = %transaction.description,
                        "amount above review threshold, flagged for review"
                    );
                }
                transactions.push(transaction);
            }
            Err(error) => {
                warn!(line = line_index, %error, "dropping transaction with unresolvable date");
                diagnostics.push(Diagnostic { line_index, error });
            }
        }
    }

    TransactionCollection::new(transactions)
}

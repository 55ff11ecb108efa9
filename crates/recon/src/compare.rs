use log::{debug, info};

use crate::aggregate::aggregate_balances;
use crate::config::ColumnConfig;
use crate::error::ReconError;
use crate::model::{ComparisonRow, ComparisonSummary, RowStatus, Table};
use crate::normalize::{normalize_account, normalize_amount};

/// Check that every column the comparison reads is present.
///
/// Order matters for the error the caller sees: amount in the merged table,
/// account on both sides, reference balance in the summary.
fn check_columns(merged: &Table, summary: &Table, columns: &ColumnConfig) -> Result<(), ReconError> {
    merged.require_column(&columns.amount)?;
    merged.require_column(&columns.account)?;
    summary.require_column(&columns.account)?;
    summary.require_column(&columns.reference_balance)?;
    Ok(())
}

/// Compare computed balances per account against the summary sheet.
///
/// The summary drives the result: one row per summary row, in summary
/// order. Accounts that only exist in the merged data are dropped.
pub fn compare(merged: &Table, summary: &Table, columns: &ColumnConfig) -> Result<Vec<ComparisonRow>, ReconError> {
    check_columns(merged, summary, columns)?;

    let balances = aggregate_balances(merged, &columns.account, &columns.amount)?;
    debug!("computed balances for {} account(s)", balances.len());

    let account_idx = summary.require_column(&columns.account)?;
    let reference_idx = summary.require_column(&columns.reference_balance)?;

    let mut rows = Vec::with_capacity(summary.len());
    for (order, row) in summary.rows().iter().enumerate() {
        let reference = normalize_amount(&row[reference_idx]).map_err(|_| ReconError::AmountParse {
            table: summary.name().to_string(),
            row: order + 1,
            value: row[reference_idx].to_string(),
        })?;
        let account = normalize_account(&row[account_idx]);
        let computed = account.as_deref().and_then(|a| balances.get(a));
        let difference = match (computed, reference) {
            (Some(c), Some(r)) => Some(c - r),
            _ => None,
        };

        rows.push(ComparisonRow {
            order,
            account,
            computed,
            reference,
            difference,
        });
    }

    rows.sort_by_key(|r| r.order);
    info!("comparison completed: {} row(s)", rows.len());
    Ok(rows)
}

/// Count rows per status.
pub fn summarize(rows: &[ComparisonRow], tolerance: f64) -> ComparisonSummary {
    let mut summary = ComparisonSummary {
        rows: rows.len(),
        ..Default::default()
    };

    for row in rows {
        match row.status(tolerance) {
            RowStatus::Balanced => summary.balanced += 1,
            RowStatus::Mismatch => summary.mismatched += 1,
            RowStatus::MissingComputed => summary.missing_computed += 1,
            RowStatus::Unreadable => summary.unreadable += 1,
        }
    }

    summary
}

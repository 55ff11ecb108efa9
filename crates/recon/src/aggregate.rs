use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::Table;
use crate::normalize::{normalize_account, normalize_amount};

/// Computed balance per normalized account code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountBalances {
    balances: BTreeMap<String, f64>,
}

impl AccountBalances {
    pub fn get(&self, account: &str) -> Option<f64> {
        self.balances.get(account).copied()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Group rows by normalized account and sum their normalized amounts.
///
/// Rows without an account code are left out. Missing amounts add nothing,
/// so an account whose amounts are all empty still shows up with 0.0.
pub fn aggregate_balances(
    table: &Table,
    account_column: &str,
    amount_column: &str,
) -> Result<AccountBalances, ReconError> {
    let amount_idx = table.require_column(amount_column)?;
    let account_idx = table.require_column(account_column)?;

    let mut balances: BTreeMap<String, f64> = BTreeMap::new();

    for (row_idx, row) in table.rows().iter().enumerate() {
        let amount = normalize_amount(&row[amount_idx]).map_err(|_| ReconError::AmountParse {
            table: table.name().to_string(),
            row: row_idx + 1,
            value: row[amount_idx].to_string(),
        })?;

        let Some(account) = normalize_account(&row[account_idx]) else {
            continue;
        };
        let entry = balances.entry(account).or_insert(0.0);
        if let Some(amount) = amount {
            *entry += amount;
        }
    }

    Ok(AccountBalances { balances })
}

//! Revenue aggregation over transactions.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::foundation::{ContentId, Timestamp};

use super::{Transaction, TransactionStatus};

/// How many items `top_content_by_revenue` keeps.
pub const TOP_CONTENT_LIMIT: usize = 10;

/// Revenue earned by one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRevenue {
    pub content_id: ContentId,
    pub content_title: String,
    pub revenue: Decimal,
    pub sales: u32,
}

/// Admin dashboard figures.
///
/// Revenue only counts completed transactions. Amounts are summed as-is
/// across currencies and saturate at `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_revenue: Decimal,
    pub total_count: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub this_month_revenue: Decimal,
    pub this_month_count: u32,
    pub average_value: Decimal,
    pub top_content_by_revenue: Vec<ContentRevenue>,
}

impl TransactionStats {
    /// Aggregates `transactions`; "this month" is the UTC calendar month of `now`.
    pub fn compute(transactions: &[Transaction], now: Timestamp) -> Self {
        let mut stats = TransactionStats {
            total_revenue: Decimal::ZERO,
            total_count: 0,
            success_count: 0,
            failure_count: 0,
            this_month_revenue: Decimal::ZERO,
            this_month_count: 0,
            average_value: Decimal::ZERO,
            top_content_by_revenue: Vec::new(),
        };
        let mut by_content: HashMap<&ContentId, ContentRevenue> = HashMap::new();

        for txn in transactions {
            stats.total_count += 1;
            match txn.status {
                TransactionStatus::Completed => {
                    stats.success_count += 1;
                    stats.total_revenue = stats.total_revenue.saturating_add(txn.amount);
                    if txn.created_at.same_month_as(&now) {
                        stats.this_month_count += 1;
                        stats.this_month_revenue =
                            stats.this_month_revenue.saturating_add(txn.amount);
                    }
                    let entry = by_content
                        .entry(&txn.content.content_id)
                        .or_insert_with(|| ContentRevenue {
                            content_id: txn.content.content_id.clone(),
                            content_title: txn.content.content_title.clone(),
                            revenue: Decimal::ZERO,
                            sales: 0,
                        });
                    entry.revenue = entry.revenue.saturating_add(txn.amount);
                    entry.sales += 1;
                }
                TransactionStatus::Failed => stats.failure_count += 1,
                TransactionStatus::Pending | TransactionStatus::Refunded => {}
            }
        }

        if stats.success_count > 0 {
            stats.average_value = stats.total_revenue / Decimal::from(stats.success_count);
        }

        let mut top: Vec<ContentRevenue> = by_content.into_values().collect();
        top.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        top.truncate(TOP_CONTENT_LIMIT);
        stats.top_content_by_revenue = top;

        stats
    }
}

//! GetTransactionStatsHandler - Query handler for admin revenue figures.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{PaymentError, TransactionStats};
use crate::ports::TransactionRepository;

#[derive(Debug, Clone)]
pub struct GetTransactionStatsQuery {
    /// Reference instant for "this month".
    pub as_of: Timestamp,
}

impl GetTransactionStatsQuery {
    pub fn now() -> Self {
        Self {
            as_of: Timestamp::now(),
        }
    }
}

pub type GetTransactionStatsResult = TransactionStats;

pub struct GetTransactionStatsHandler {
    transactions: Arc<dyn TransactionRepository>,
}

impl GetTransactionStatsHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: GetTransactionStatsQuery,
    ) -> Result<GetTransactionStatsResult, PaymentError> {
        let transactions = self.transactions.list_all().await?;
        Ok(TransactionStats::compute(&transactions, query.as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::payment::test_fixtures::Harness;
    use crate::domain::payment::{Confirmation, ContentKind, PaymentMethod, StatusUpdate};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn counts_completed_revenue_only() {
        let harness = Harness::new();
        let repo = harness.repository();
        let done_a = harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        let done_b = harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        let failed = harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;

        for id in [done_a, done_b] {
            repo.update_status(&id, &StatusUpdate::completed(Some("pay".into()), Confirmation::Confirmed))
                .await
                .unwrap();
        }
        repo.update_status(&failed, &StatusUpdate::failed("declined"))
            .await
            .unwrap();

        let stats = GetTransactionStatsHandler::new(repo)
            .handle(GetTransactionStatsQuery::now())
            .await
            .unwrap();

        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.total_revenue, Decimal::new(99800, 2));
        assert_eq!(stats.average_value, Decimal::new(49900, 2));
        assert_eq!(stats.this_month_count, 2);
        assert_eq!(stats.top_content_by_revenue.len(), 1);
        assert_eq!(stats.top_content_by_revenue[0].sales, 2);
    }

    #[tokio::test]
    async fn empty_store_has_zero_average() {
        let harness = Harness::new();
        let stats = GetTransactionStatsHandler::new(harness.repository())
            .handle(GetTransactionStatsQuery::now())
            .await
            .unwrap();
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.average_value, Decimal::ZERO);
    }
}

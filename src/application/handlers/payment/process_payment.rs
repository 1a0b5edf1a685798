//! ProcessPaymentHandler - runs one gateway attempt for a pending transaction.
//!
//! ```text
//! PENDING -> config missing/inactive      -> FAILED
//! PENDING -> adapter success              -> COMPLETED -> grant entitlement
//! PENDING -> adapter failure / panic      -> FAILED
//! ```
//!
//! The handler never returns an error. Every path ends in a `PaymentOutcome`,
//! and every path past the pending check writes a terminal status before
//! returning. Entitlement is granted only after the `completed` write.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rust_decimal::Decimal;

use crate::adapters::gateways::GatewayRegistry;
use crate::domain::foundation::TransactionId;
use crate::domain::payment::{
    CurrencyCode, GatewayConfig, GatewayError, GatewayReceipt, Money, PaymentMethod,
    PaymentOutcome, StatusUpdate, Transaction, GENERIC_PAYMENT_FAILURE,
};
use crate::ports::{GatewayConfigReader, GatewayRequest, Payer, TransactionRepository};

use super::{GrantEntitlementCommand, GrantEntitlementHandler};

#[derive(Debug, Clone)]
pub struct ProcessPaymentCommand {
    pub transaction_id: TransactionId,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub currency: String,
}

pub type ProcessPaymentResult = PaymentOutcome;

pub struct ProcessPaymentHandler {
    transactions: Arc<dyn TransactionRepository>,
    config_reader: Arc<dyn GatewayConfigReader>,
    gateways: GatewayRegistry,
    grant: GrantEntitlementHandler,
}

impl ProcessPaymentHandler {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        config_reader: Arc<dyn GatewayConfigReader>,
        gateways: GatewayRegistry,
        grant: GrantEntitlementHandler,
    ) -> Self {
        Self {
            transactions,
            config_reader,
            gateways,
            grant,
        }
    }

    pub async fn handle(&self, cmd: ProcessPaymentCommand) -> ProcessPaymentResult {
        let id = cmd.transaction_id;
        let method = cmd.payment_method;

        let transaction = match self.transactions.get(&id).await {
            Ok(Some(txn)) => txn,
            Ok(None) => {
                tracing::warn!(transaction_id = %id, "Payment requested for unknown transaction");
                return PaymentOutcome::failed("Transaction not found");
            }
            Err(e) => {
                tracing::error!(
                    transaction_id = %id,
                    code = %e.code(),
                    error = %e,
                    "Failed to load transaction"
                );
                return PaymentOutcome::failed(GENERIC_PAYMENT_FAILURE);
            }
        };

        if !transaction.is_pending() {
            tracing::warn!(
                transaction_id = %id,
                status = transaction.status.as_str(),
                "Payment requested for settled transaction"
            );
            return PaymentOutcome::failed(format!(
                "Transaction is already {}",
                transaction.status
            ));
        }

        let money = match requested_money(&cmd, &transaction) {
            Ok(money) => money,
            Err(reason) => {
                tracing::warn!(transaction_id = %id, reason = %reason, "Payment request rejected");
                return PaymentOutcome::failed(reason);
            }
        };

        let result = match self.load_config(method).await {
            Ok(config) => {
                let request = GatewayRequest {
                    transaction_id: id,
                    money,
                    payer: Payer {
                        user_id: transaction.user_id.clone(),
                        email: transaction.user_email.clone(),
                    },
                    description: transaction.content.content_title.clone(),
                };
                self.dispatch(method, &request, &config).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(receipt) => self.settle_success(&transaction, &receipt).await,
            Err(err) => self.settle_failure(&transaction, method, &err).await,
        }
    }

    /// Fresh config for `method`, refusing a missing or inactive block.
    async fn load_config(&self, method: PaymentMethod) -> Result<GatewayConfig, GatewayError> {
        let config = self
            .config_reader
            .load()
            .await
            .map_err(|e| GatewayError::unexpected(format!("gateway settings unavailable: {}", e)))?
            .ok_or(GatewayError::NotConfigured)?;
        config.active_credentials(method)?;
        Ok(config)
    }

    async fn dispatch(
        &self,
        method: PaymentMethod,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        let adapter = self
            .gateways
            .get(method)
            .ok_or(GatewayError::NotConfigured)?;

        AssertUnwindSafe(adapter.attempt(request, config))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(GatewayError::unexpected(panic_message(panic))))
    }

    async fn settle_success(
        &self,
        transaction: &Transaction,
        receipt: &GatewayReceipt,
    ) -> PaymentOutcome {
        let id = transaction.id;
        let outcome = PaymentOutcome::succeeded(receipt);

        let update = StatusUpdate::completed(receipt.provider_payment_id.clone(), receipt.confirmation);
        if let Err(e) = self.transactions.update_status(&id, &update).await {
            tracing::error!(
                transaction_id = %id,
                gateway = transaction.payment_method.as_str(),
                code = %e.code(),
                error = %e,
                "Payment succeeded but completed status was not recorded"
            );
            return outcome.needing_reconciliation();
        }

        if let Err(e) = self
            .grant
            .handle(GrantEntitlementCommand { transaction_id: id })
            .await
        {
            tracing::error!(
                transaction_id = %id,
                user_id = %transaction.user_id,
                code = %e.code(),
                error = %e,
                "Payment succeeded but entitlement grant failed"
            );
            return outcome.needing_reconciliation();
        }

        tracing::info!(
            transaction_id = %id,
            gateway = transaction.payment_method.as_str(),
            confirmation = receipt.confirmation.as_str(),
            "Payment completed"
        );
        outcome
    }

    async fn settle_failure(
        &self,
        transaction: &Transaction,
        method: PaymentMethod,
        err: &GatewayError,
    ) -> PaymentOutcome {
        let id = transaction.id;
        match err {
            GatewayError::Signing(_) | GatewayError::Unexpected(_) => {
                tracing::error!(
                    transaction_id = %id,
                    gateway = method.as_str(),
                    error = %err,
                    "Payment attempt failed"
                );
            }
            _ => {
                tracing::warn!(
                    transaction_id = %id,
                    gateway = method.as_str(),
                    error = %err,
                    "Payment attempt failed"
                );
            }
        }

        let outcome = PaymentOutcome::from_gateway_error(method, err);
        if let Err(e) = self
            .transactions
            .update_status(&id, &StatusUpdate::failed(err.user_message(method)))
            .await
        {
            tracing::error!(
                transaction_id = %id,
                error = %e,
                "Failed status was not recorded"
            );
        }
        outcome
    }
}

/// Checks the requested charge against the stored transaction.
fn requested_money(cmd: &ProcessPaymentCommand, transaction: &Transaction) -> Result<Money, String> {
    let currency = CurrencyCode::new(&cmd.currency).map_err(|e| e.to_string())?;
    let money = Money::new(cmd.amount, currency).map_err(|e| e.to_string())?;

    if cmd.payment_method != transaction.payment_method
        || money.amount() != transaction.amount
        || money.currency() != &transaction.currency
    {
        return Err("Payment details do not match the transaction".to_string());
    }
    Ok(money)
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("gateway adapter panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("gateway adapter panicked: {}", message)
    } else {
        "gateway adapter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateways::MockGatewayAdapter;
    use crate::application::handlers::payment::test_fixtures::Harness;
    use crate::domain::entitlement::SubscriptionTier;
    use crate::domain::payment::{Confirmation, ContentKind, TransactionStatus};

    struct Setup {
        harness: Harness,
        handler: ProcessPaymentHandler,
    }

    fn setup(adapter: Arc<MockGatewayAdapter>) -> Setup {
        let harness = Harness::new();
        let grant = GrantEntitlementHandler::new(harness.repository(), harness.entitlements());
        let handler = ProcessPaymentHandler::new(
            harness.repository(),
            harness.config_reader(),
            GatewayRegistry::new().with(adapter),
            grant,
        );
        Setup { harness, handler }
    }

    fn command(id: TransactionId, method: PaymentMethod) -> ProcessPaymentCommand {
        ProcessPaymentCommand {
            transaction_id: id,
            payment_method: method,
            amount: Decimal::new(49900, 2),
            currency: "INR".into(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn success_completes_and_grants() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay));
        let s = setup(adapter.clone());
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Razorpay)).await;

        assert!(outcome.success);
        assert_eq!(outcome.provider_payment_id.as_deref(), Some("mock_razorpay_payment"));
        assert!(!outcome.reconciliation_required);

        let txn = s.harness.transaction(&id).await;
        assert_eq!(txn.status, TransactionStatus::Completed);
        assert_eq!(txn.provider_payment_id.as_deref(), Some("mock_razorpay_payment"));
        assert!(s.harness.entitlement().await.grants(&Harness::content()));

        let request = adapter.last_request().unwrap();
        assert_eq!(request.description, "Petra at Dawn");
        assert_eq!(request.payer.email, "traveller@example.com");
    }

    #[tokio::test]
    async fn optimistic_success_is_recorded() {
        let adapter = Arc::new(MockGatewayAdapter::returning(
            PaymentMethod::Paytm,
            Ok(GatewayReceipt::optimistic(None)),
        ));
        let s = setup(adapter);
        s.harness.configure(PaymentMethod::Paytm, true).await;
        let id = s.harness.pending(ContentKind::Premium, PaymentMethod::Paytm).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Paytm)).await;

        assert!(outcome.success);
        assert_eq!(outcome.confirmation, Some(Confirmation::Optimistic));
        let txn = s.harness.transaction(&id).await;
        assert_eq!(txn.confirmation(), Some(Confirmation::Optimistic));
        assert_eq!(
            s.harness.entitlement().await.subscription_tier,
            SubscriptionTier::Premium
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn inactive_gateway_fails_without_dispatch() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Paytm));
        let s = setup(adapter.clone());
        s.harness.configure(PaymentMethod::Paytm, false).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Paytm).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Paytm)).await;

        assert_eq!(outcome, PaymentOutcome::failed("Paytm is not configured or enabled"));
        assert_eq!(adapter.attempts(), 0);
        let txn = s.harness.transaction(&id).await;
        assert_eq!(txn.status, TransactionStatus::Failed);
        assert_eq!(txn.failure_reason(), Some("Paytm is not configured or enabled"));
    }

    #[tokio::test]
    async fn missing_settings_record_is_not_configured() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Stripe));
        let s = setup(adapter.clone());
        let id = s.harness.pending(ContentKind::Video, PaymentMethod::Stripe).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Stripe)).await;

        assert_eq!(outcome.error.as_deref(), Some("Stripe is not configured or enabled"));
        assert_eq!(adapter.attempts(), 0);
    }

    #[tokio::test]
    async fn declined_payment_fails_with_reason() {
        let adapter = Arc::new(MockGatewayAdapter::failing(
            PaymentMethod::Razorpay,
            GatewayError::declined("Card declined by issuer"),
        ));
        let s = setup(adapter);
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Razorpay)).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Card declined by issuer"));
        let txn = s.harness.transaction(&id).await;
        assert_eq!(txn.status, TransactionStatus::Failed);
        assert_eq!(txn.failure_reason(), Some("Card declined by issuer"));
        assert!(!s.harness.entitlement().await.grants(&Harness::content()));
    }

    #[tokio::test]
    async fn panicking_adapter_is_contained() {
        let adapter = Arc::new(MockGatewayAdapter::panicking(PaymentMethod::Stripe, "boom"));
        let s = setup(adapter);
        s.harness.configure(PaymentMethod::Stripe, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Stripe).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Stripe)).await;

        assert_eq!(outcome, PaymentOutcome::failed(GENERIC_PAYMENT_FAILURE));
        assert_eq!(s.harness.transaction(&id).await.status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn settled_transaction_is_refused_without_writes() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay));
        let s = setup(adapter.clone());
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        s.handler.handle(command(id, PaymentMethod::Razorpay)).await;
        let before = s.harness.transaction(&id).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Razorpay)).await;

        assert_eq!(outcome, PaymentOutcome::failed("Transaction is already completed"));
        assert_eq!(adapter.attempts(), 1);
        assert_eq!(s.harness.transaction(&id).await, before);
    }

    #[tokio::test]
    async fn mismatched_amount_is_refused() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay));
        let s = setup(adapter.clone());
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;

        let outcome = s
            .handler
            .handle(ProcessPaymentCommand {
                amount: Decimal::new(100, 2),
                ..command(id, PaymentMethod::Razorpay)
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(adapter.attempts(), 0);
        assert_eq!(s.harness.transaction(&id).await.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_transaction_is_refused() {
        let s = setup(Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay)));
        let outcome = s
            .handler
            .handle(command(TransactionId::new(), PaymentMethod::Razorpay))
            .await;
        assert_eq!(outcome, PaymentOutcome::failed("Transaction not found"));
        assert_eq!(s.harness.transaction_count().await, 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Reconciliation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn grant_failure_requires_reconciliation() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay));
        let s = setup(adapter);
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        s.harness.store.set_unavailable("users", true).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Razorpay)).await;

        assert!(outcome.success);
        assert!(outcome.reconciliation_required);
        assert_eq!(
            outcome.error.as_deref(),
            Some(PaymentOutcome::RECONCILIATION_MESSAGE)
        );
        assert_eq!(s.harness.transaction(&id).await.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn status_write_failure_skips_grant() {
        let adapter = Arc::new(MockGatewayAdapter::succeeding(PaymentMethod::Razorpay));
        let s = setup(adapter);
        s.harness.configure(PaymentMethod::Razorpay, true).await;
        let id = s.harness.pending(ContentKind::Destination, PaymentMethod::Razorpay).await;
        s.harness.store.set_unavailable("transactions", true).await;

        let outcome = s.handler.handle(command(id, PaymentMethod::Razorpay)).await;

        assert!(outcome.reconciliation_required);
        assert!(!s.harness.entitlement().await.grants(&Harness::content()));
    }
}

//! Entitlement fields on the user profile document.
//!
//! Only `subscriptionTier` and `purchasedContent` are touched; the rest of
//! the profile belongs to other parts of the storefront. A user without a
//! profile document is a free user with no purchases.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;

use crate::domain::entitlement::{SubscriptionTier, UserEntitlement};
use crate::domain::foundation::{ContentId, UserId};
use crate::domain::payment::PaymentError;
use crate::ports::{
    Document, DocumentStore, EntitlementStore, EntitlementStream, FieldValue, FieldWrites, Query,
    DOCUMENT_ID_FIELD,
};

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct DocumentEntitlementStore {
    store: Arc<dyn DocumentStore>,
}

impl DocumentEntitlementStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn write(&self, user_id: &UserId, mut fields: FieldWrites) -> Result<(), PaymentError> {
        fields.insert("updatedAt".into(), FieldValue::ServerTimestamp);
        self.store
            .set(USERS_COLLECTION, user_id.as_str(), fields)
            .await?;
        Ok(())
    }
}

fn entitlement_from(user_id: &UserId, doc: Option<Document>) -> Result<UserEntitlement, PaymentError> {
    let Some(doc) = doc else {
        return Ok(UserEntitlement::free(user_id.clone()));
    };

    let mut fields = doc.fields;
    fields.insert("userId".into(), Value::String(user_id.as_str().to_string()));
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        PaymentError::infrastructure(format!("user profile '{}' is malformed: {}", user_id, e))
    })
}

#[async_trait]
impl EntitlementStore for DocumentEntitlementStore {
    async fn get(&self, user_id: &UserId) -> Result<UserEntitlement, PaymentError> {
        let doc = self.store.get(USERS_COLLECTION, user_id.as_str()).await?;
        entitlement_from(user_id, doc)
    }

    async fn add_purchased_content(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<(), PaymentError> {
        let mut fields = FieldWrites::new();
        fields.insert(
            "purchasedContent".into(),
            FieldValue::ArrayUnion(vec![Value::String(content_id.as_str().to_string())]),
        );
        self.write(user_id, fields).await?;

        tracing::info!(user_id = %user_id, content_id = %content_id, "Content added to purchases");
        Ok(())
    }

    async fn upgrade_to_premium(&self, user_id: &UserId) -> Result<(), PaymentError> {
        let mut fields = FieldWrites::new();
        fields.insert(
            "subscriptionTier".into(),
            FieldValue::value(SubscriptionTier::Premium.as_str()),
        );
        self.write(user_id, fields).await?;

        tracing::info!(user_id = %user_id, "Subscription upgraded to premium");
        Ok(())
    }

    async fn watch(&self, user_id: &UserId) -> Result<EntitlementStream, PaymentError> {
        let stream = self
            .store
            .subscribe(
                USERS_COLLECTION,
                Query::new().where_eq(DOCUMENT_ID_FIELD, user_id.as_str()),
            )
            .await?;

        let user_id = user_id.clone();
        Ok(stream
            .map(move |snapshot| {
                let doc = snapshot?.into_iter().next();
                entitlement_from(&user_id, doc)
            })
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryDocumentStore;
    use serde_json::json;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn content(id: &str) -> ContentId {
        ContentId::new(id).unwrap()
    }

    #[tokio::test]
    async fn missing_profile_is_free() {
        let store = DocumentEntitlementStore::new(Arc::new(InMemoryDocumentStore::new()));
        assert_eq!(store.get(&user()).await.unwrap(), UserEntitlement::free(user()));
    }

    #[tokio::test]
    async fn granting_twice_keeps_one_entry() {
        let docs = Arc::new(InMemoryDocumentStore::new());
        let store = DocumentEntitlementStore::new(docs.clone());

        store.add_purchased_content(&user(), &content("dest-1")).await.unwrap();
        store.add_purchased_content(&user(), &content("dest-1")).await.unwrap();

        let doc = docs.get(USERS_COLLECTION, "user-1").await.unwrap().unwrap();
        assert_eq!(doc.fields["purchasedContent"], json!(["dest-1"]));
        assert!(store.get(&user()).await.unwrap().grants(&content("dest-1")));
    }

    #[tokio::test]
    async fn upgrade_keeps_other_profile_fields() {
        let docs = Arc::new(InMemoryDocumentStore::new());
        let mut profile = FieldWrites::new();
        profile.insert("displayName".into(), FieldValue::value("Ana"));
        docs.set(USERS_COLLECTION, "user-1", profile).await.unwrap();

        let store = DocumentEntitlementStore::new(docs.clone());
        store.upgrade_to_premium(&user()).await.unwrap();

        let ent = store.get(&user()).await.unwrap();
        assert_eq!(ent.subscription_tier, SubscriptionTier::Premium);
        assert!(ent.grants(&content("anything")));

        let doc = docs.get(USERS_COLLECTION, "user-1").await.unwrap().unwrap();
        assert_eq!(doc.fields["displayName"], json!("Ana"));
    }

    #[tokio::test]
    async fn watch_emits_current_then_updates() {
        let store = DocumentEntitlementStore::new(Arc::new(InMemoryDocumentStore::new()));
        let mut stream = store.watch(&user()).await.unwrap();

        let initial = stream.next().await.unwrap().unwrap();
        assert_eq!(initial.subscription_tier, SubscriptionTier::Free);

        store.upgrade_to_premium(&user()).await.unwrap();
        let updated = stream.next().await.unwrap().unwrap();
        assert_eq!(updated.subscription_tier, SubscriptionTier::Premium);
    }

    #[tokio::test]
    async fn offline_store_surfaces_infrastructure_error() {
        let docs = Arc::new(InMemoryDocumentStore::new());
        docs.set_unavailable(USERS_COLLECTION, true).await;
        let store = DocumentEntitlementStore::new(docs);

        let err = store.upgrade_to_premium(&user()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Infrastructure(_)));
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;
use crate::payment_requests::payment_requests_model::{NewPaymentRequest, PaymentRequest};
use crate::payment_requests::payment_requests_traits::PaymentRequestServiceTrait;
use crate::store::{PaymentRequestStore, UserId};

/// Payment-request creation and reads. Matching deposits against open
/// requests happens inside the transaction posting chain, not here.
pub struct PaymentRequestService<S> {
    store: Arc<S>,
}

impl<S: PaymentRequestStore> PaymentRequestService<S> {
    pub fn new(store: Arc<S>) -> Self {
        PaymentRequestService { store }
    }
}

#[async_trait]
impl<S: PaymentRequestStore> PaymentRequestServiceTrait for PaymentRequestService<S> {
    fn get_requests(&self, user: UserId) -> Result<Vec<PaymentRequest>> {
        self.store.payment_requests(user)
    }

    async fn create_request(
        &self,
        user: UserId,
        new_request: NewPaymentRequest,
    ) -> Result<PaymentRequest> {
        new_request.validate()?;
        self.store.insert_payment_request(user, &new_request).await
    }
}

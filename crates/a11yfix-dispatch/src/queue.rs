use a11yfix_core::message::WorkOrder;
use aws_sdk_sqs::error::DisplayErrorContext;

use crate::error::DispatchError;

/// Work-order queue scoped to a single SQS queue URL.
pub struct WorkQueue {
    sqs: aws_sdk_sqs::Client,
    queue_url: String,
}

impl WorkQueue {
    #[must_use]
    pub fn new(sqs: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            sqs,
            queue_url: queue_url.into(),
        }
    }

    /// Builds the SQS client from the shared SDK configuration.
    #[must_use]
    pub fn from_sdk_config(config: &aws_config::SdkConfig, queue_url: impl Into<String>) -> Self {
        Self::new(aws_sdk_sqs::Client::new(config), queue_url)
    }

    #[must_use]
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    /// Serializes `order` and enqueues it, returning the message id.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Serialize`] when the order cannot be
    /// encoded, or [`DispatchError::Queue`] when SQS rejects the send.
    pub async fn send(&self, order: &WorkOrder) -> Result<String, DispatchError> {
        let body = serde_json::to_string(order)?;
        let output = self
            .sqs
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| DispatchError::Queue(DisplayErrorContext(&e).to_string()))?;

        output
            .message_id()
            .map(str::to_owned)
            .ok_or_else(|| DispatchError::Queue("send succeeded without a message id".into()))
    }
}

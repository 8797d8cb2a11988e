//! C5 (publisher half) — encodes a typed domain event with the project's
//! binary codec and publishes it on its self-computed subject (§4.5.1).

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use transport_domain::{encode, Subjecter};

use crate::client::Client;
use crate::errors::PublishError;

pub struct Publisher {
    client: Client,
}

impl Publisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self, token, event), fields(subject = %event.subject().as_str()))]
    pub async fn publish<T>(&self, token: &CancellationToken, event: &T) -> Result<(), PublishError>
    where
        T: Subjecter + Serialize,
    {
        if token.is_cancelled() {
            return Err(PublishError::Canceled);
        }
        let payload = encode(event)?;
        let subject = event.subject();
        self.client
            .core()
            .publish(subject.as_str(), payload.into())
            .await?;
        Ok(())
    }
}

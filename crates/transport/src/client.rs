//! C2 — Client & Control Plane: wraps a single broker connection, exposes
//! the durable-log context, and creates/gets the three canonical streams
//! idempotently.

use std::sync::Arc;

use tracing::instrument;

use transport_domain::StreamName;

use crate::broker::{Broker, BrokerCore};
use crate::config::ConsumerPolicy;
use crate::consumer::Consumer;
use crate::errors::ControlPlaneError;

#[derive(Clone)]
pub struct Client {
    core: Arc<BrokerCore>,
}

impl Client {
    pub fn new(broker: &Broker) -> Self {
        Self {
            core: broker.core.clone(),
        }
    }

    /// Idempotently ensures the three canonical streams exist. Safe to call
    /// repeatedly (§8 invariant 1).
    #[instrument(skip(self))]
    pub async fn setup(&self) -> Result<(), ControlPlaneError> {
        for name in StreamName::ALL {
            self.core
                .ensure_stream(name)
                .await
                .map_err(|e| ControlPlaneError::Io(e.to_string()))?;
        }
        Ok(())
    }

    pub async fn get_stream(&self, name: StreamName) -> Result<StreamHandle, ControlPlaneError> {
        if !self.core.has_stream(name).await {
            return Err(ControlPlaneError::UnknownStream(name.to_string()));
        }
        Ok(StreamHandle {
            name,
            core: self.core.clone(),
        })
    }

    pub async fn get_cmd_consumer(
        &self,
        name: &str,
        filter_subjects: Vec<String>,
    ) -> Result<Consumer, ControlPlaneError> {
        self.get_consumer(StreamName::Commands, name, filter_subjects).await
    }

    pub async fn get_evt_consumer(
        &self,
        name: &str,
        filter_subjects: Vec<String>,
    ) -> Result<Consumer, ControlPlaneError> {
        self.get_consumer(StreamName::Events, name, filter_subjects).await
    }

    pub async fn get_log_consumer(
        &self,
        name: &str,
        filter_subjects: Vec<String>,
    ) -> Result<Consumer, ControlPlaneError> {
        self.get_consumer(StreamName::Logs, name, filter_subjects).await
    }

    async fn get_consumer(
        &self,
        stream: StreamName,
        name: &str,
        filter_subjects: Vec<String>,
    ) -> Result<Consumer, ControlPlaneError> {
        let handle = self.get_stream(stream).await?;
        handle.create_or_update_consumer(name, filter_subjects).await
    }

    /// Releases the connection. The broker process itself is stopped
    /// independently via `Broker::shutdown`.
    pub fn close(self) {
        drop(self);
    }

    pub(crate) fn core(&self) -> Arc<BrokerCore> {
        self.core.clone()
    }
}

/// A handle to one of the three canonical streams (§4.2).
pub struct StreamHandle {
    pub name: StreamName,
    core: Arc<BrokerCore>,
}

impl StreamHandle {
    /// Delegates to C3. Identical parameters on repeated calls are a no-op
    /// beyond returning a handle; changed parameters update the consumer in
    /// place (§4.3 invariant).
    pub async fn create_or_update_consumer(
        &self,
        name: &str,
        filter_subjects: Vec<String>,
    ) -> Result<Consumer, ControlPlaneError> {
        let policy = ConsumerPolicy::default();
        self.core
            .create_or_update_consumer(self.name, name, filter_subjects, policy)
            .await?;
        Ok(Consumer::new(self.core.clone(), name.to_string()))
    }
}

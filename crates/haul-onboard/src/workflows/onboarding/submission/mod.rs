//! Boundary between the in-memory wizard and the one remote call that receives an application.
//!
//! A submission is split into three parts so ownership stays explicit: the wizard hands out a
//! [`SubmissionTicket`], the adapter turns it into a [`SubmissionOutcome`], and the wizard applies
//! the outcome only if it still belongs to the current attempt. Spawned attempts are wrapped in a
//! [`SubmissionHandle`] that aborts the request when dropped, so a torn-down wizard never receives
//! a late result.

mod gateway;

pub use gateway::{
    ApplicationGateway, GatewayError, HttpApplicationGateway, SubmissionReceipt,
    GENERIC_FAILURE_MESSAGE,
};

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use super::domain::SubmissionStatus;
use super::payload::ApplicationPayload;
use super::wizard::{WizardController, WizardError};

/// Payload snapshot for one numbered attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub attempt: u32,
    pub payload: ApplicationPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub attempt: u32,
    pub result: Result<SubmissionReceipt, GatewayError>,
}

/// Sends tickets through a gateway. Exactly one request per ticket, never retried automatically.
pub struct SubmissionAdapter<G> {
    gateway: Arc<G>,
}

impl<G> Clone for SubmissionAdapter<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> SubmissionAdapter<G>
where
    G: ApplicationGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn send(&self, ticket: SubmissionTicket) -> SubmissionOutcome {
        send_ticket(self.gateway.as_ref(), ticket).await
    }

    /// Run one attempt to completion against `wizard` and report its resulting status.
    pub async fn submit<'w>(
        &self,
        wizard: &'w mut WizardController,
    ) -> Result<&'w SubmissionStatus, WizardError> {
        let ticket = wizard.begin_submission()?;
        let outcome = self.send(ticket).await;
        wizard.finish_submission(outcome);
        Ok(wizard.submission())
    }

    /// Start the attempt on the runtime and return a handle that cancels it when dropped.
    pub fn dispatch(&self, ticket: SubmissionTicket) -> SubmissionHandle {
        let attempt = ticket.attempt;
        let gateway = Arc::clone(&self.gateway);
        let task = tokio::spawn(async move { send_ticket(gateway.as_ref(), ticket).await });

        SubmissionHandle {
            attempt,
            task: Some(task),
        }
    }
}

async fn send_ticket<G>(gateway: &G, ticket: SubmissionTicket) -> SubmissionOutcome
where
    G: ApplicationGateway + ?Sized,
{
    let SubmissionTicket { attempt, payload } = ticket;
    info!(
        attempt,
        files = payload.file_count(),
        bytes = payload.total_file_bytes(),
        "sending driver application"
    );

    let result = gateway.submit_application(payload).await;
    SubmissionOutcome { attempt, result }
}

/// In-flight attempt owned by the caller.
#[derive(Debug)]
pub struct SubmissionHandle {
    attempt: u32,
    task: Option<JoinHandle<SubmissionOutcome>>,
}

impl SubmissionHandle {
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Wait for the attempt. A panicking or aborted task becomes a failed outcome.
    /// Dropping this future before it resolves still aborts the request.
    pub async fn outcome(mut self) -> SubmissionOutcome {
        let attempt = self.attempt;
        let joined = match self.task.as_mut() {
            Some(task) => task.await,
            None => {
                return SubmissionOutcome {
                    attempt,
                    result: Err(GatewayError::Transport(
                        "submission task already consumed".to_string(),
                    )),
                }
            }
        };
        self.task = None;

        match joined {
            Ok(outcome) => outcome,
            Err(err) => SubmissionOutcome {
                attempt,
                result: Err(GatewayError::Transport(format!(
                    "submission task ended unexpectedly: {err}"
                ))),
            },
        }
    }
}

impl Drop for SubmissionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

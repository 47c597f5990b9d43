use chrono::{DateTime, Duration, Utc};
use design_engine::DesignState;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::{OrderError, SubmissionFailure};
use crate::request::{Accepted, SubmissionResponse};
use crate::store::{self, SessionStore};

/// Identifies one submission attempt; responses for older attempts are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionTicket(pub u64);

/// Where the order submission currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPhase {
    Idle,
    InFlight {
        ticket: SubmissionTicket,
        started: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },
    Succeeded {
        redirect: String,
    },
    Failed {
        failure: SubmissionFailure,
    },
}

/// Drives a single order submission at a time.
///
/// The design and the persisted session are only discarded once the endpoint
/// confirms the order. Failures and timeouts leave both in place so the user
/// can retry.
#[derive(Debug, Clone)]
pub struct Checkout {
    phase: SubmissionPhase,
    timeout: Duration,
    next_ticket: u64,
}

impl Checkout {
    pub fn new(timeout: Duration) -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            timeout,
            next_ticket: 1,
        }
    }

    pub fn with_timeout_secs(secs: u64) -> Self {
        Self::new(Duration::seconds(secs.min(i64::MAX as u64 / 1000) as i64))
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, SubmissionPhase::InFlight { .. })
    }

    /// Start a submission. Rejected while another one is in flight.
    #[instrument(skip(self))]
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<SubmissionTicket, OrderError> {
        if self.is_in_flight() {
            warn!("resubmission refused while in flight");
            return Err(OrderError::SubmissionInFlight);
        }
        let ticket = SubmissionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = SubmissionPhase::InFlight {
            ticket,
            started: now,
            deadline: now
                .checked_add_signed(self.timeout)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        info!(ticket = ticket.0, "order submission started");
        Ok(ticket)
    }

    /// Record the endpoint's response.
    ///
    /// On acceptance the design is reset and the persisted session cleared.
    /// On rejection both are kept and the failure is returned.
    #[instrument(skip(self, response, state, store), fields(status = response.status))]
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        response: &SubmissionResponse,
        state: &mut DesignState,
        store: &mut dyn SessionStore,
        storage_key: &str,
    ) -> Result<Accepted, OrderError> {
        self.expect_in_flight(ticket)?;
        match response.classify() {
            Ok(accepted) => {
                state.reset();
                if let Err(e) = store::clear_design(store, storage_key) {
                    warn!(error = %e, "could not clear persisted design");
                }
                info!(ticket = ticket.0, redirect = %accepted.redirect, "order accepted");
                self.phase = SubmissionPhase::Succeeded {
                    redirect: accepted.redirect.clone(),
                };
                Ok(accepted)
            }
            Err(failure) => {
                warn!(ticket = ticket.0, error = %failure, "order rejected");
                self.phase = SubmissionPhase::Failed {
                    failure: failure.clone(),
                };
                Err(failure.into())
            }
        }
    }

    /// Record a transport failure (no response at all).
    pub fn fail(&mut self, ticket: SubmissionTicket, reason: impl Into<String>) -> OrderError {
        if let Err(e) = self.expect_in_flight(ticket) {
            return e;
        }
        let failure = SubmissionFailure::Network {
            reason: reason.into(),
        };
        warn!(ticket = ticket.0, error = %failure, "order submission failed");
        self.phase = SubmissionPhase::Failed {
            failure: failure.clone(),
        };
        failure.into()
    }

    /// Expire an in-flight submission past its deadline.
    ///
    /// Returns the timeout failure once; a response arriving later for the
    /// same ticket is refused as stale.
    pub fn poll_timeout(&mut self, now: DateTime<Utc>) -> Option<SubmissionFailure> {
        let SubmissionPhase::InFlight {
            ticket, deadline, ..
        } = &self.phase
        else {
            return None;
        };
        if now < *deadline {
            return None;
        }
        warn!(ticket = ticket.0, "order submission timed out");
        self.phase = SubmissionPhase::Failed {
            failure: SubmissionFailure::Timeout,
        };
        Some(SubmissionFailure::Timeout)
    }

    fn expect_in_flight(&self, ticket: SubmissionTicket) -> Result<(), OrderError> {
        match &self.phase {
            SubmissionPhase::InFlight { ticket: current, .. } if *current == ticket => Ok(()),
            _ => Err(OrderError::StaleTicket { ticket: ticket.0 }),
        }
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::with_timeout_secs(30)
    }
}

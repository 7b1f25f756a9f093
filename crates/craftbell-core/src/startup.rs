//! Startup orchestrator: turns "instance currently stopped" into a
//! single terminal [`StartupOutcome`].
//!
//! The poll is a bounded state machine with a fixed attempt budget and
//! fixed interval; the host's boot time is roughly constant, so there
//! is no backoff. Divergent states end the loop immediately rather
//! than polling a state that can never converge. All waiting goes
//! through the caller-supplied [`Sleeper`] so tests run without real
//! delays.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::instance::{InstanceObservation, InstanceState};

/// Async seam over the compute control plane for one configured
/// instance. Production impl lives in the server crate; tests script
/// observation sequences.
#[async_trait]
pub trait ComputeController: Send + Sync {
    /// Fresh observation of the instance. Never cached.
    async fn describe(&self) -> Result<InstanceObservation>;

    /// Fire-and-forget start request.
    async fn start(&self) -> Result<()>;
}

/// Clock seam for the poll delay.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Attempt budget and delay for the readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    /// 20 attempts at 6 s apiece — a ~120 s ceiling.
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_secs(6),
        }
    }
}

/// Terminal result of one orchestration run. Consumed only by
/// [`crate::message::render_outcome`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Instance was already up before we did anything. The address may
    /// still be unassigned; rendering covers that.
    AlreadyRunning { address: Option<String> },
    /// We issued the start and the instance came up with an address.
    Started { address: String },
    /// Poll budget exhausted without reaching running-with-address.
    TimedOut,
    /// Start request failed, a describe failed, or the instance landed
    /// in a state it cannot recover from.
    Failed { reason: String },
    /// Initial state was neither running nor stopped; starting now
    /// could double-start a mid-transition instance.
    TransientState { state: InstanceState },
}

/// One step of the post-start poll, as a pure decision over a fresh
/// observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    Ready { address: String },
    KeepWaiting,
    Diverged { state: InstanceState },
}

/// Classify an observation taken while waiting for a just-started
/// instance. Running without an address keeps waiting here — address
/// assignment may lag readiness. (Contrast with the pre-start branch
/// in [`resolve_startup`], where running without an address is already
/// a terminal answer.)
pub fn poll_step(observation: &InstanceObservation) -> PollStep {
    match (&observation.state, &observation.address) {
        (InstanceState::Running, Some(address)) => PollStep::Ready {
            address: address.clone(),
        },
        (InstanceState::Running, None) | (InstanceState::Pending, _) => PollStep::KeepWaiting,
        (state, _) => PollStep::Diverged {
            state: state.clone(),
        },
    }
}

/// Resolve the instance to exactly one [`StartupOutcome`].
///
/// A start request is issued only when the initial observation is
/// `stopped` — starting an already-running instance is a no-op that
/// must never be attempted, and any transitional state is left alone.
pub async fn resolve_startup<C, S>(compute: &C, sleeper: &S, policy: PollPolicy) -> StartupOutcome
where
    C: ComputeController,
    S: Sleeper,
{
    let initial = match compute.describe().await {
        Ok(observation) => observation,
        Err(e) => {
            warn!(error = %e, "initial describe failed");
            return StartupOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    match initial.state {
        InstanceState::Running => {
            return StartupOutcome::AlreadyRunning {
                address: initial.address,
            };
        }
        InstanceState::Stopped => {}
        state => {
            return StartupOutcome::TransientState { state };
        }
    }

    if let Err(e) = compute.start().await {
        warn!(error = %e, "start request failed");
        return StartupOutcome::Failed {
            reason: e.to_string(),
        };
    }
    info!("start request accepted, polling for readiness");

    for attempt in 1..=policy.attempts {
        sleeper.pause(policy.interval).await;

        let observation = match compute.describe().await {
            Ok(observation) => observation,
            Err(e) => {
                warn!(attempt, error = %e, "describe failed while polling");
                return StartupOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match poll_step(&observation) {
            PollStep::Ready { address } => {
                info!(attempt, %address, "instance is reachable");
                return StartupOutcome::Started { address };
            }
            PollStep::Diverged { state } => {
                warn!(attempt, state = %state, "instance left the boot path");
                return StartupOutcome::Failed {
                    reason: state.name().to_string(),
                };
            }
            PollStep::KeepWaiting => {
                info!(attempt, state = %observation.state, "waiting for address");
            }
        }
    }

    StartupOutcome::TimedOut
}

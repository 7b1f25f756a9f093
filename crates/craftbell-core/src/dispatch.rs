//! Webhook dispatcher: walks the inbound events, maintains the
//! subscriber list, and runs the startup orchestrator when a trigger
//! phrase shows up.
//!
//! Every failure here is converted to a log entry or a degraded result
//! at the point it happens; the webhook transport must always get a
//! success-shaped acknowledgement, so nothing propagates out of
//! [`Dispatcher::handle`].

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::message::{render_outcome, welcome_message};
use crate::startup::{resolve_startup, ComputeController, Sleeper};
use crate::webhook::WebhookEnvelope;

/// Key-value persistence for subscriber ids. `add` is idempotent by
/// id; `list_all` returns ids only.
pub trait SubscriberStore: Send + Sync {
    fn add(&self, id: &str) -> Result<()>;
    fn list_all(&self) -> Result<Vec<String>>;
}

/// Outbound push seam. One call per recipient per message.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(&self, to: &str, text: &str) -> Result<()>;
}

/// What a webhook delivery amounted to. Each variant carries the fixed
/// acknowledgement body the transport expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    NoEvents,
    Notified,
    NoAction,
    ErrorAcknowledged,
}

impl DispatchOutcome {
    pub fn body(&self) -> &'static str {
        match self {
            Self::NoEvents => "No events to process",
            Self::Notified => "Server status processed and notified to all users.",
            Self::NoAction => "No action taken",
            Self::ErrorAcknowledged => "Error occurred but processed",
        }
    }
}

pub struct Dispatcher<'a, St, No, C, Sl> {
    store: &'a St,
    notifier: &'a No,
    compute: &'a C,
    sleeper: &'a Sl,
    config: &'a Config,
}

impl<'a, St, No, C, Sl> Dispatcher<'a, St, No, C, Sl>
where
    St: SubscriberStore,
    No: PushNotifier,
    C: ComputeController,
    Sl: Sleeper,
{
    pub fn new(
        store: &'a St,
        notifier: &'a No,
        compute: &'a C,
        sleeper: &'a Sl,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            notifier,
            compute,
            sleeper,
            config,
        }
    }

    /// Process one webhook delivery. Stops at the first event that
    /// triggers a start; later events in the same envelope are not
    /// processed.
    pub async fn handle(&self, envelope: &WebhookEnvelope) -> DispatchOutcome {
        if envelope.events.is_empty() {
            return DispatchOutcome::NoEvents;
        }

        for event in &envelope.events {
            match event.event_type.as_str() {
                "follow" => {
                    let user_id = &event.source.user_id;
                    if let Err(e) = self.store.add(user_id) {
                        warn!(user = %user_id, error = %e, "failed to save subscriber");
                    } else {
                        info!(user = %user_id, "subscriber added");
                    }
                    if let Err(e) = self.notifier.send(user_id, &welcome_message()).await {
                        warn!(user = %user_id, error = %e, "welcome push failed");
                    }
                }
                "join" => {
                    info!(source_type = %event.source.source_type, "bot joined a chat");
                }
                "message" => {
                    let Some(message) = &event.message else {
                        continue;
                    };
                    if message.message_type != "text" {
                        continue;
                    }
                    if !self.is_trigger(&message.text) {
                        continue;
                    }

                    let outcome =
                        resolve_startup(self.compute, self.sleeper, self.config.poll_policy())
                            .await;
                    info!(outcome = ?outcome, "startup resolved");
                    self.fan_out(&render_outcome(&outcome)).await;
                    return DispatchOutcome::Notified;
                }
                other => {
                    info!(event_type = %other, "ignoring event");
                }
            }
        }

        DispatchOutcome::NoAction
    }

    fn is_trigger(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.config
            .trigger_keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }

    /// Sequential delivery to every subscriber. A failed send is
    /// logged and the rest still get their message; a failed scan
    /// degrades to an empty list.
    async fn fan_out(&self, text: &str) {
        let targets = match self.store.list_all() {
            Ok(targets) => targets,
            Err(e) => {
                warn!(error = %e, "could not list subscribers");
                Vec::new()
            }
        };
        for target in targets {
            if let Err(e) = self.notifier.send(&target, text).await {
                warn!(user = %target, error = %e, "push failed");
            }
        }
    }
}

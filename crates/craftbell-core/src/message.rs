//! Outcome → user-facing text. Pure, no I/O, so every branch is
//! testable without a compute backend or push API.

use crate::startup::StartupOutcome;

/// Default port for Bedrock-edition clients (consoles, phones).
const BEDROCK_PORT: u16 = 19132;

/// Render the notification text for one terminal outcome. Same value
/// in, same text out.
pub fn render_outcome(outcome: &StartupOutcome) -> String {
    match outcome {
        StartupOutcome::AlreadyRunning { address } => {
            let address_info = match address {
                Some(address) => format!("Address:\n{address}"),
                None => "The address is still being assigned.".to_string(),
            };
            format!("The Minecraft server is already running.\n\n{address_info}")
        }
        StartupOutcome::Started { address } => format!(
            "The Minecraft server is up!\n\n\
             Address:\n{address}\n\n\
             How to connect:\n\
             Java edition (PC): {address}\n\
             Bedrock edition (console/phone): {address}, port {BEDROCK_PORT}\n\n\
             The server shuts itself down automatically when idle."
        ),
        StartupOutcome::TimedOut => "The server started, but its address is taking a while to be \
                                     assigned (timed out). Please try again in a few minutes."
            .to_string(),
        StartupOutcome::Failed { reason } => format!(
            "Something went wrong while starting the server ({reason}). \
             Please check the cloud console and credentials."
        ),
        StartupOutcome::TransientState { state } => format!(
            "The server is currently {state}. Please wait a moment and try again."
        ),
    }
}

/// Greeting pushed on a follow event, naming the trigger phrase.
pub fn welcome_message() -> String {
    "Welcome to the Minecraft server bot!\n\n\
     Say \"start server\" and I'll boot it and message you when it's \
     reachable. You're on the notification list now."
        .to_string()
}

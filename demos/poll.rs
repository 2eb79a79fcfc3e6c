//! Polls a HA-Dash device once and prints every presentation transition.
//!
//! ```bash
//! HADASH_BASE_URL=http://192.168.1.50 cargo run --example poll
//! ```

use hadash_status::{PollOutcome, PresentationState, StatusPoller, StatusView};
use tracing_subscriber::EnvFilter;

struct ConsoleView;

impl StatusView for ConsoleView {
    fn render(&self, state: &PresentationState) {
        match state {
            PresentationState::Loading => println!("[status] Loading..."),
            PresentationState::Warning(message) => println!("[status] {message}"),
            PresentationState::Success(status) => println!("[status] {status}"),
            PresentationState::Error => println!("[status] Error (retry available)"),
        }
    }

    fn set_version(&self, version: &str) {
        println!("[version] {version}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let poller = StatusPoller::from_env(ConsoleView).map_err(anyhow::Error::msg)?;

    let mut outcome = poller.start().await;
    // one manual retry, as a user clicking the button would
    if let Some(PollOutcome::Failed(_)) = outcome {
        outcome = Some(poller.retry().await);
    }

    match outcome {
        Some(PollOutcome::Success(payload)) => {
            println!("device is {} (firmware {})", payload.status, payload.version)
        }
        Some(PollOutcome::Failed(err)) => anyhow::bail!("status unavailable: {err}"),
        Some(PollOutcome::Superseded) | None => {}
    }

    Ok(())
}

//! Terminal dashboard: polls a running roster server and prints what it finds.

use clap::Parser;
use roster::config::LogFormat;
use roster::dashboard::{FetchDashboardReqwest, PollState, Poller, RetryPolicy};
use roster::telemetry;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the roster server
    #[arg(long, env = "WATCH_API_URL", default_value = "http://localhost:3000")]
    url: Url,

    /// Attempts per run before giving up
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,

    /// Wait between attempts (e.g. "2s", "500ms")
    #[arg(long, default_value = "2s")]
    retry_delay: humantime::Duration,

    /// Per-request timeout
    #[arg(long, default_value = "10s")]
    request_timeout: humantime::Duration,
}

fn print_snapshot(state: &PollState) {
    if let PollState::Success(snapshot) = state {
        println!("{} ({})", snapshot.connection.message, snapshot.connection.timestamp.to_rfc3339());
        println!("{:>4}  {:<30}  created_at", "id", "name");
        for user in &snapshot.users {
            println!("{:>4}  {:<30}  {}", user.id, user.name, user.created_at.to_rfc3339());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(LogFormat::Pretty)?;

    let fetcher = FetchDashboardReqwest::new(args.url.clone(), args.request_timeout.into())?;
    let policy = RetryPolicy {
        max_attempts: args.max_attempts,
        delay: args.retry_delay.into(),
    };
    let poller = Poller::new(fetcher, policy);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, stopping");
                cancel.cancel();
            }
        }
    });

    // Log every transition, including the intermediate attempts
    let mut rx = poller.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            match &*rx.borrow_and_update() {
                PollState::Idle => info!("Idle"),
                PollState::Fetching { attempt } => info!(attempt, max_attempts = policy.max_attempts, "Fetching"),
                PollState::Success(snapshot) => info!(users = snapshot.users.len(), "Loaded"),
                PollState::Failed { attempts, error } => info!(attempts, %error, "Failed"),
            }
        }
    });

    info!(url = %args.url, "Watching roster server");
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let state = poller.run(&cancel).await;
        match state {
            PollState::Success(_) => {
                print_snapshot(&state);
                return Ok(());
            }
            PollState::Failed { attempts, error } => {
                eprintln!("Could not load data after {attempts} attempts: {error}");
                eprintln!("Press 'r' and Enter to retry, anything else to quit.");

                let answer = tokio::select! {
                    _ = cancel.cancelled() => None,
                    line = stdin.next_line() => line?,
                };
                if answer.as_deref().map(str::trim) != Some("r") {
                    anyhow::bail!("giving up after {attempts} attempts");
                }
            }
            PollState::Idle | PollState::Fetching { .. } => {
                anyhow::bail!("cancelled");
            }
        }
    }
}

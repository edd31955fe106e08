//! Watch command - subscribe to relay events and print them as they arrive.

use arealink::relay::{RelayClient, WS_CHANNEL, WS_CLOSE, WS_ERROR, WS_OPEN};
use chrono::Local;
use console::style;
use serde_json::Value;
use tracing::{info, warn};

use super::common::{build_runtime, shutdown_token, GlobalOptions};
use crate::error::CliError;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub channels: Vec<String>,
    pub events: Vec<String>,
    pub compact: bool,
}

/// Run the watch command until Ctrl+C.
pub fn run(options: &GlobalOptions, args: WatchArgs) -> Result<(), CliError> {
    let config = options.load_config()?;
    let relay_config = options.relay_config(&config);
    let cancel = shutdown_token()?;
    let runtime = build_runtime()?;

    runtime.block_on(async move {
        let client = RelayClient::websocket(relay_config);

        let _open = client.subscribe(WS_CHANNEL, WS_OPEN, |_: &Value| {
            info!("Relay connected");
        });
        let _error = client.subscribe(WS_CHANNEL, WS_ERROR, |data: &Value| {
            warn!(error = %data, "Relay connection error");
        });
        let _close = client.subscribe(WS_CHANNEL, WS_CLOSE, |_: &Value| {
            info!("Relay disconnected, retrying");
        });

        let mut subscriptions = Vec::new();
        for channel in &args.channels {
            for event in &args.events {
                let key = format!("{}:{}", channel, event);
                let compact = args.compact;
                subscriptions.push(client.subscribe(
                    channel.as_str(),
                    event.as_str(),
                    move |data: &Value| print_event(&key, data, compact),
                ));
            }
        }

        println!("Watching {} on {}", args.events.join(", "), client.endpoint());
        println!("Press Ctrl+C to exit");
        println!();

        client.connect();
        cancel.cancelled().await;
        client.shutdown().await;
        drop(subscriptions);
    });

    Ok(())
}

fn print_event(key: &str, data: &Value, compact: bool) {
    let body = if compact {
        data.to_string()
    } else {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
    };
    println!(
        "{} {} {}",
        style(Local::now().format("%H:%M:%S%.3f")).dim(),
        style(key).cyan().bold(),
        body
    );
}

//! Publish command - send one message to the relay and exit.

use arealink::relay::{RelayClient, LOCAL_CHANNEL};
use serde_json::Value;

use super::common::{build_runtime, connect_relay, shutdown_token, GlobalOptions, CONNECT_TIMEOUT};
use crate::error::CliError;

/// Arguments for the publish command.
pub struct PublishArgs {
    pub channel: String,
    pub event: String,
    pub data: Option<String>,
}

/// Run the publish command.
pub fn run(options: &GlobalOptions, args: PublishArgs) -> Result<(), CliError> {
    let data = parse_payload(args.data.as_deref())?;
    if args.channel == LOCAL_CHANNEL {
        return Err(CliError::InvalidArgument(format!(
            "'{}' events never leave the process; pick a relay channel",
            LOCAL_CHANNEL
        )));
    }

    let config = options.load_config()?;
    let relay_config = options.relay_config(&config);
    let cancel = shutdown_token()?;
    let runtime = build_runtime()?;

    runtime.block_on(async move {
        let client = RelayClient::websocket(relay_config);
        let connected = connect_relay(&client, &cancel, CONNECT_TIMEOUT).await;

        let result = match connected {
            Ok(true) => client
                .publish(&args.channel, &args.event, data)
                .map_err(CliError::from),
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };

        client.shutdown().await;
        if result.is_ok() && !cancel.is_cancelled() {
            println!("Published {}:{}", args.channel, args.event);
        }
        result
    })
}

/// Parse the optional JSON payload. Missing payloads publish `null`.
fn parse_payload(raw: Option<&str>) -> Result<Value, CliError> {
    match raw {
        None => Ok(Value::Null),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| CliError::InvalidArgument(format!("payload is not valid JSON: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_payload_is_null() {
        assert_eq!(parse_payload(None).unwrap(), Value::Null);
    }

    #[test]
    fn test_payload_is_parsed() {
        assert_eq!(
            parse_payload(Some(r#"{"speed": 90}"#)).unwrap(),
            json!({"speed": 90})
        );
        assert_eq!(parse_payload(Some("\"text\"")).unwrap(), json!("text"));
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        assert!(matches!(
            parse_payload(Some("{speed")),
            Err(CliError::InvalidArgument(_))
        ));
    }
}

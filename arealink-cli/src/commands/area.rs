//! Area command - measure a polygon and optionally stream it to the export socket.

use arealink::drawing::DrawingSession;
use arealink::export::{ExportConfig, PolygonExporter, PolygonMessage};
use arealink::geometry::GeoPoint;
use chrono::Utc;
use console::style;

use super::common::{build_runtime, shutdown_token, GlobalOptions, CONNECT_TIMEOUT};
use crate::error::CliError;

/// Arguments for the area command.
pub struct AreaArgs {
    pub points: Vec<String>,
    pub export: bool,
    pub export_url: Option<String>,
}

/// Run the area command.
pub fn run(options: &GlobalOptions, args: AreaArgs) -> Result<(), CliError> {
    let points = args
        .points
        .iter()
        .map(String::as_str)
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = DrawingSession::new();
    for point in points {
        session.add_point(point);
    }
    let message = session.finalize(Utc::now())?;

    if let PolygonMessage::PolygonFinalized(record) = &message {
        eprintln!("{}", style(record.summary()).green());
    }
    let json = serde_json::to_string_pretty(&message)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    println!("{}", json);

    if args.export {
        let config = options.load_config()?;
        let mut export_config = config.export.clone();
        if let Some(url) = args.export_url {
            export_config.url = url;
        }
        export(&export_config, &message)?;
    }

    Ok(())
}

fn export(config: &ExportConfig, message: &PolygonMessage) -> Result<(), CliError> {
    let cancel = shutdown_token()?;
    let runtime = build_runtime()?;

    runtime.block_on(async {
        let exporter = PolygonExporter::websocket(config);

        let connected = tokio::select! {
            _ = cancel.cancelled() => None,
            connected = exporter.wait_connected(CONNECT_TIMEOUT) => Some(connected),
        };

        let result = match connected {
            None => Ok(()),
            Some(false) => Err(CliError::Timeout(format!("export socket at {}", config.url))),
            Some(true) => exporter.export(message).map_err(CliError::from),
        };

        exporter.shutdown().await;
        if result.is_ok() && connected == Some(true) {
            eprintln!("Sent polygon {} to {}", message.polygon_id(), config.url);
        }
        result
    })
}

/// Parse a `lat,lng` pair.
fn parse_point(raw: &str) -> Result<GeoPoint, CliError> {
    let invalid = || CliError::InvalidArgument(format!("'{}' is not a lat,lng pair", raw));

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lng.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(CliError::InvalidArgument(format!(
            "'{}' is outside the valid coordinate range",
            raw
        )));
    }
    Ok(GeoPoint::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = parse_point("51.5, -0.12").unwrap();
        assert_eq!(point.latitude, 51.5);
        assert_eq!(point.longitude, -0.12);
    }

    #[test]
    fn test_parse_point_rejects_garbage() {
        assert!(parse_point("51.5").is_err());
        assert!(parse_point("north,east").is_err());
        assert!(parse_point("").is_err());
    }

    #[test]
    fn test_parse_point_rejects_out_of_range() {
        assert!(parse_point("91,0").is_err());
        assert!(parse_point("0,-181").is_err());
    }
}

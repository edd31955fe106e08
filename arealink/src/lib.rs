//! arealink - geometry and relay plumbing for map and overlay front-ends
//!
//! This library provides the non-visual core of two browser tools:
//!
//! - [`geometry`]: area, bounds and centre of latitude/longitude polygons
//! - [`drawing`] and [`export`]: the polygon drawing model and the socket
//!   that streams finalized/deleted polygons
//! - [`relay`]: a reconnecting `channel:event` publish-subscribe client
//! - [`overlay`]: the scoreboard model fed by relay game updates
//!
//! [`transport`] holds the connection plumbing shared by the relay client and
//! the exporter; [`config`] and [`logging`] serve the CLI.

pub mod config;
pub mod drawing;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod relay;
pub mod transport;

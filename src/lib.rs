//! Sensor plot service.
//!
//! Reduces raw temperature/humidity/battery history from sensor nodes into
//! chart-ready series and axis settings. The reduction itself lives in
//! [`application::plot_reducer`] and is a pure function of its input; the
//! rest of the crate fetches history from the sensor gateway, refreshes it on
//! a schedule and serves the result over HTTP.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::plot_reducer::{reduce_plot_data, PlotReducer};
pub use domain::measurement::{Field, MeasurementRecord, NodeId};
pub use domain::plot::PlotResult;

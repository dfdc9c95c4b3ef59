// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under the Mozilla Public License (MPL) 2.0.
// See LICENSE for details.

//! # **Label Statistics** - *Per-label running statistics over streamed, partitioned scans*
//!
//! For every label found in a companion label array, accumulates count, sum, sum of
//! squares, extrema, spatial bounding box and an optional fixed-bin histogram over a
//! dataset that is scanned in several sequential passes, each split across parallel
//! workers. Each worker writes only to its own table; one associative merge at the end
//! produces results that do not depend on how the data was split.
//!
//! ## Layout
//! - [`engine`]: `begin` / `process_element` / `end` hooks and the query surface
//! - [`statistics`]: histogram, per-label record, worker tables, merge and derived pass
//! - [`scan`]: reference multi-pass, multi-worker driver over dense arrays
//! - [`config`]: histogram mode and bin parameters
//!
//! ## Features
//! - `fast_hash` (default): `ahash` maps for the worker tables
//! - `parallel` (default): rayon-backed partition scanning in the driver

pub mod config;
pub mod engine;
pub mod errors;
pub mod scan;

pub mod statistics {
    pub mod derived;
    pub mod histogram;
    pub mod record;
    pub mod reduce;
    pub mod region;
    pub mod worker;
}

pub mod traits {
    pub mod dense_iter;
    pub mod label;
}

pub mod utils;

pub use config::{HistogramSpec, StatsConfig};
pub use engine::{LabelStatisticsEngine, Phase};
pub use errors::StatsError;
pub use scan::{ImageView, StreamingDriver};
pub use statistics::histogram::Histogram;
pub use statistics::record::LabelStatistics;
pub use statistics::region::{BoundingBox, Region};
pub use statistics::worker::WorkerTable;

//! # Kerf Core
//!
//! Core types and utilities for the Kerf laser driver:
//! job model (vector and raster parts), pixel/millimetre unit conversion,
//! error types, and progress reporting.

pub mod error;
pub mod job;
pub mod listener;
pub mod units;

pub use error::{ConnectionError, Error, JobError, Result};
pub use job::{
    apply_start_point, check_job, Job, JobPart, LaserProperty, Point, Raster3dPart, RasterPart,
    VectorCommand, VectorPart,
};
pub use listener::{LogProgressListener, NullProgressListener, ProgressListener};

//! # Kerf Encoder
//!
//! Translates job parts into the controller's textual G-code stream:
//! - [`emitter`]: low-level command emission with power/speed suppression
//! - [`vector`]: ordered vector path encoding
//! - [`raster`]: boustrophedon raster-to-vector scan conversion
//! - [`bitmap`]: raster part construction from image files

pub mod bitmap;
pub mod emitter;
pub mod raster;
pub mod vector;

pub use bitmap::{raster3d_part_from_image, raster_part_from_image, BitmapImportParams};
pub use emitter::{expand_command_block, EmitterState, EncoderConfig, GcodeEmitter};
pub use raster::{encode_raster, encode_raster3d};
pub use vector::encode_vector;

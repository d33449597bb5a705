//! Draw in the air with hand gestures.
//!
//! Hand landmark frames are classified into gestures that paint on a
//! persistent raster, erase or clear it, and send it off for analysis.
//! The library exposes the engine and its collaborator traits so other front
//! ends can plug in their own landmark source, surface or analysis sink.

pub mod analysis;
pub mod app;
pub mod config;
pub mod draw;
pub mod engine;
pub mod gesture;
pub mod source;

pub use config::Config;

//! # Retro-Reflective Target Detection Library
//!
//! A trait-based pipeline that finds bright, hollow, retro-reflective markers
//! in camera frames, renders a preview and reports target geometry to a host.
//!
//! ## Core Features
//!
//! - **HSV Segmentation**: Inclusive per-channel color window into a binary mask
//! - **Hull Candidates**: Outer contours reduced to convex hulls with size, shape and fullness metrics
//! - **Filter Profiles**: GENERAL and PAIRED acceptance thresholds, or hand-tuned ones
//! - **Target Selection**: Largest-N ranking or stacked-pair matching
//! - **Preview**: RAW, THRESH, TARGETS and TARGETS_PLUS visualizations, JPEG encoding
//! - **Host Bridge**: Frame sources, texture sinks and target receivers as traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use target_vision::{ColorRange, Pipeline, VisionConfig};
//!
//! let pipeline = Pipeline::from_config(&VisionConfig::general());
//! let frame = image::open("frame.png")?.to_rgba8();
//!
//! let range = ColorRange::new(60, 110, 100, 255, 150, 255);
//! let (_mask, detection) = pipeline.detect(&frame, &range)?;
//! for target in &detection.targets {
//!     println!("{:.1}, {:.1}", target.centroid_x, target.centroid_y);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Host Integration
//!
//! ```rust,no_run
//! use target_vision::{
//!     CapturedTexture, FrameParams, FrameProcessor, ImageFrameSource, TargetsInfo,
//!     TextureHandle, VisionConfig,
//! };
//!
//! let config = VisionConfig::paired();
//! let mut processor = FrameProcessor::from_config(&config);
//! let mut info = TargetsInfo::new();
//! processor.initialize(&mut info)?;
//!
//! let frame = image::open("frame.png")?.to_rgba8();
//! let params = FrameParams::from_config(frame.width(), frame.height(), TextureHandle(1), &config);
//! let mut source = ImageFrameSource::new(frame);
//! let mut texture = CapturedTexture::new();
//! processor.process_frame(&mut source, &params, &mut texture, &mut info)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod visualize;
pub mod encode;
pub mod host;
pub mod processor;

// Re-exports for convenience
pub use error::{Result, VisionError};
pub use types::{Candidate, ColorRange, Detection, FilterOutcome, RejectReason, RejectedCandidate, Target};
pub use config::{
    CentroidMarker, DisplayMode, FilterProfile, InclusiveRange, OverlayStyle, ProfileConfig,
    SelectionStrategy, VisionConfig,
};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use visualize::Visualizer;
pub use encode::FrameEncoder;
pub use host::{CapturedTexture, ImageFrameSource, TargetRecord, TargetsInfo};
pub use processor::{FrameParams, FrameProcessor, FrameReport};

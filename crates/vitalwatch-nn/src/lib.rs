//! # VitalWatch NN
//!
//! Inference primitives for the VitalWatch telemetry service.
//!
//! The classifier used by the service is a small dense network with a shared
//! trunk and two softmax heads: one over activity classes, one over anomaly
//! classes. Raw sensor features are standardized with a fitted scaler before
//! the forward pass, and the winning anomaly class is decoded back to its
//! label with a label encoder.
//!
//! ```text
//! [f64; 8] ─▶ StandardScaler ─▶ TwoHeadNetwork ─┬─▶ argmax ─▶ activity index
//!                                                └─▶ argmax ─▶ LabelEncoder ─▶ anomaly label
//! ```
//!
//! All artifacts are plain JSON so they can be exported from any training
//! stack; see [`bundle`] for the on-disk layout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vitalwatch_nn::ModelBundle;
//!
//! let bundle = ModelBundle::load("models/demo")?;
//! let prediction = bundle.predict(&[0.1, 0.2, 9.8, 0.0, 0.1, 9.7, 72.0, 98.0])?;
//! println!("{} (activity {})", prediction.anomaly_label, prediction.activity_index);
//! # Ok::<(), vitalwatch_nn::NnError>(())
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod encoder;
pub mod error;
pub mod network;
pub mod scaler;

pub use bundle::{BundleInfo, ModelBundle, Prediction};
pub use encoder::LabelEncoder;
pub use error::{NnError, NnResult};
pub use network::{argmax, Activation, DenseLayer, HeadOutputs, LayerSpec, NetworkSpec, TwoHeadNetwork};
pub use scaler::StandardScaler;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

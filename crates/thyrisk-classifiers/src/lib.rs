//! thyrisk-classifiers: encoding and inference glue for recurrence prediction.
//!
//! This crate turns raw form fields into the fixed-order feature vector a
//! pre-trained classifier expects, runs the classifier through a small
//! adapter trait, and maps the returned label to one of two fixed
//! recurrence-risk messages.
//!
//! Two encoding variants ship side by side. They share the feature list but
//! differ in label vocabulary, case handling and label interpretation, so
//! the variant is always chosen explicitly through configuration.
pub mod assembler;
pub mod config;
pub mod encoding;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prediction;
pub mod schema;

//! Infer ORM relationships and enum types from a reflected relational schema.
#![warn(missing_docs)]

/// Junction-table detection and foreign-key cardinality classification.
pub mod classifier;
/// Error type shared by every stage.
pub mod error;
/// Relationship graph, naming, enum synthesis, and model text rendering.
pub mod generator;
/// File output and markdown report generation.
pub mod output;
/// Schema model, identifier normalization, and DDL / JSON loading.
pub mod parser;

/// Foreign-key cardinality classification (one-to-one vs many-to-one).
pub mod cardinality;
/// Detection of many-to-many bridge tables and self-referencing bridges.
pub mod junction;

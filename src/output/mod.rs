/// Writes the relationship JSON, model stub, and report to disk.
pub mod formatter;
/// Builds a Markdown summary of inferred relationships and enums.
pub mod report;

/// PNG encoding and export file naming.
pub(crate) mod png;
/// Export sinks.
pub(crate) mod sink;

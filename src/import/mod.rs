mod ingest;
mod record;

pub(crate) use ingest::{ingest_dir, IngestStats};

//! Unit tests that exercise several flattening components together.

mod ingestion;

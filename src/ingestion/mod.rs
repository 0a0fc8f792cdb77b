//! Ingestion of game content into analysable form.

pub mod bestiary;

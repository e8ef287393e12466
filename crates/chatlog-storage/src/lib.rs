// Flat-file storage layer
//
// This crate provides file-backed implementations for core traits:
// - JsonFileGateway: implements SnapshotGateway with two JSON blobs
//   (logs.json, sessions.json) inside a data directory

pub mod json_file;

pub use json_file::{JsonFileGateway, LOGS_FILE, SESSIONS_FILE};

//! Vendored protobuf message definitions for the PBF wire format.
//!
//! These mirror the upstream `fileformat.proto` and `osmformat.proto`
//! schemas, checked in as hand-maintained `prost` structs so the build
//! needs no protoc step. Field numbers and labels follow the published
//! schemas exactly; do not renumber.

pub mod fileformat;
pub mod osmformat;

//! Protobuf descriptor types shared by the tonic-transcode crates.
//!
//! This crate provides custom [`prost::Message`] types that preserve the
//! `google.api.http` extension (field 72295728) which standard
//! `prost_types::MethodOptions` drops during decoding.
//!
//! Only the subset of `descriptor.proto` the transcoding resolver reads is
//! modelled: files, messages (with nested types), fields (with label and
//! type), services, methods and the full `google.api.HttpRule`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod descriptor;

//! Storage module for application documents
//!
//! Provides a MinIO/S3-compatible client used to store the documents
//! attached to cooperative applications.

mod minio_client;

pub use minio_client::MinIOClient;

//! File CRUD and presigned transfer URLs.

pub mod service;

pub use service::{FileService, UploadRequest, UploadTicket};

//! Photo storage port: where uploaded image binaries live.

use std::future::Future;

use switchroom_domain::error::SwitchroomError;

/// A raw file received with a request, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Client-side file name, if the transport carried one.
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            data: data.into(),
        }
    }
}

/// Backend that stores photo binaries and hands back a reference to them.
pub trait PhotoStorage {
    /// Persist `data` and return the reference to record on the photo row.
    ///
    /// `extension` is the canonical file extension for the sniffed format.
    fn save(
        &self,
        extension: &'static str,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<String, SwitchroomError>> + Send;

    /// Delete a previously saved binary. Missing files are not an error.
    fn remove(&self, reference: String) -> impl Future<Output = Result<(), SwitchroomError>> + Send;

    /// Public URL (or path) clients use to fetch `reference`.
    fn url(&self, reference: &str) -> String;
}

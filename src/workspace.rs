//! Shared mutable store of named data artifacts
//!
//! Every operator reads and writes blobs by name. The executor performs no
//! arbitration: concurrent external access must be synchronized by the
//! caller, which is why the handle passed around is an `Arc<RwLock<_>>`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{NetError, NetResult};

/// A named f32 tensor artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Blob {
    /// Create a blob; the data length must match the shape's element count.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> NetResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NetError::ShapeMismatch(format!(
                "blob data has {} elements, shape {:?} requires {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Blob { shape, data })
    }

    /// Create a blob filled with a constant value
    pub fn filled(shape: Vec<usize>, value: f32) -> Self {
        let count = shape.iter().product();
        Blob {
            shape,
            data: vec![value; count],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn byte_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

/// String-keyed blob store
#[derive(Debug, Default)]
pub struct Workspace {
    blobs: HashMap<String, Blob>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    /// Insert or replace a blob
    pub fn create_blob(&mut self, name: impl Into<String>, blob: Blob) {
        self.blobs.insert(name.into(), blob);
    }

    pub fn blob(&self, name: &str) -> NetResult<&Blob> {
        self.blobs
            .get(name)
            .ok_or_else(|| NetError::BlobNotFound(name.to_string()))
    }

    pub fn blob_mut(&mut self, name: &str) -> NetResult<&mut Blob> {
        self.blobs
            .get_mut(name)
            .ok_or_else(|| NetError::BlobNotFound(name.to_string()))
    }

    pub fn has_blob(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    pub fn shape_of(&self, name: &str) -> NetResult<Vec<usize>> {
        Ok(self.blob(name)?.shape().to_vec())
    }

    pub fn blob_names(&self) -> Vec<&str> {
        self.blobs.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

/// Handle shared between the executor and its operator instances
pub type SharedWorkspace = Arc<RwLock<Workspace>>;

/// Create an empty shared workspace
pub fn shared_workspace() -> SharedWorkspace {
    Arc::new(RwLock::new(Workspace::new()))
}

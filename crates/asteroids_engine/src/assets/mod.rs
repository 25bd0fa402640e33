//! Asset loading
//!
//! Files are read straight into arena blocks (see [`file_io`]) and parsed
//! from there; meshes come from a forgiving Wavefront OBJ reader
//! ([`obj_loader`]).

pub mod file_io;
pub mod obj_loader;

pub use file_io::{read_bytes, text};
pub use obj_loader::{ObjLimits, ObjLoader};

use std::path::PathBuf;

use crate::foundation::memory::MemoryError;

/// Asset loading errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// The file could not be opened or read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file exists but has no content
    #[error("{0} is empty")]
    Empty(PathBuf),

    /// The file exceeds the caller's size limit
    #[error("{path} is {size} bytes, limit is {max}")]
    TooLarge {
        /// File that failed
        path: PathBuf,
        /// Actual size
        size: u64,
        /// Caller limit
        max: usize,
    },

    /// Text asset is not UTF-8
    #[error("asset is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    /// The destination arena is exhausted
    #[error("asset storage: {0}")]
    Memory(#[from] MemoryError),

    /// More vertices than the mesh limit allows
    #[error("mesh has more than {max} vertices")]
    TooManyVertices {
        /// Limit
        max: usize,
    },

    /// More triangles than the mesh limit allows
    #[error("mesh has more than {max} triangles")]
    TooManyTriangles {
        /// Limit
        max: usize,
    },

    /// No usable triangles survived parsing
    #[error("mesh has no triangles")]
    EmptyMesh,
}

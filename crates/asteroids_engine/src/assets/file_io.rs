//! Reading whole files into arena memory

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::AssetError;
use crate::foundation::memory::{Arena, Block};

/// Read the file at `path` into a fresh block of `arena`
///
/// Files larger than `max_size` bytes are refused before anything is
/// allocated.
///
/// # Errors
///
/// Missing or unreadable files, empty files, files over the limit and an
/// exhausted arena are all reported as [`AssetError`]s.
pub fn read_bytes(arena: &mut Arena, path: &Path, max_size: usize) -> Result<Block, AssetError> {
    let io_error = |source: std::io::Error| AssetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    if size == 0 {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    let len = usize::try_from(size)
        .ok()
        .filter(|&len| len <= max_size)
        .ok_or_else(|| AssetError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: max_size,
        })?;

    let block = arena.alloc(len, 1)?;
    if let Some(bytes) = arena.bytes_mut(block) {
        file.read_exact(bytes).map_err(io_error)?;
    }
    log::debug!("Read {len} bytes from {} into [{}]", path.display(), arena.tag());
    Ok(block)
}

/// View a block as UTF-8 text
///
/// # Errors
///
/// [`AssetError::Utf8`] if the bytes are not valid UTF-8.
pub fn text(arena: &Arena, block: Block) -> Result<&str, AssetError> {
    let bytes = arena.bytes(block).unwrap_or_default();
    Ok(std::str::from_utf8(bytes)?)
}

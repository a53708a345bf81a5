//! Capability-scoped reads of configuration documents.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Directory holding `path`; `"."` for bare file names.
fn containing_dir(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    }
}

/// Read the document at `path` through a handle on its directory.
///
/// A missing directory or file yields `Ok(None)` so optional sources can be
/// skipped.
pub(crate) fn read_optional(path: &Utf8Path) -> io::Result<Option<Vec<u8>>> {
    let not_found = |err: io::Error| {
        if err.kind() == io::ErrorKind::NotFound {
            Ok(None)
        } else {
            Err(err)
        }
    };
    let Some(name) = path.file_name() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{path}` does not name a document"),
        ));
    };
    match Dir::open_ambient_dir(containing_dir(path), ambient_authority()) {
        Ok(dir) => dir.read(name).map(Some).or_else(not_found),
        Err(err) => not_found(err),
    }
}

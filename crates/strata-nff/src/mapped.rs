use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;

use strata_columnar::Region;

/// A read-only memory mapping of one column file.
///
/// Dropping the value (or the last clone of the `Column` that owns it)
/// unmaps the file, on every exit path.
#[derive(Debug)]
pub struct MappedFile {
    map: Mmap,
}

impl MappedFile {
    /// Map `path` read-only.
    pub fn open(path: &Path) -> io::Result<MappedFile> {
        let file = File::open(path)?;
        // Invariant: the file is opened read-only and this process never
        // grows or truncates it while mapped.
        let map = unsafe { Mmap::map(&file)? };
        Ok(MappedFile { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Region for MappedFile {
    fn bytes(&self) -> &[u8] {
        &self.map
    }
}

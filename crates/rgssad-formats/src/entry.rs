//! Directory entries recovered from the archive table

use crate::error::{Result, RgssadError};
use std::path::PathBuf;

/// Separator used by entry names inside the archive
pub const NATIVE_SEPARATOR: char = '\\';

/// One packed file described by the directory table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    /// Relative path with the archive's native backslash separators
    pub name: String,
    /// Payload length in bytes
    pub size: u32,
    /// Absolute offset of the encrypted payload in the archive stream
    pub payload_offset: u64,
    /// Key the payload keystream starts from
    pub content_key: u32,
}

impl DirectoryEntry {
    /// Offset one past the last payload byte
    pub fn end_offset(&self) -> u64 {
        self.payload_offset + u64::from(self.size)
    }

    /// Name converted to a host-relative path.
    ///
    /// Both `\` and `/` are treated as separators and `.` components are
    /// dropped. Names that are empty, rooted, contain `..` or a drive prefix
    /// are rejected with [`RgssadError::UnsafePath`]. A `:` past the first
    /// component is only rejected on Windows, where it names a stream.
    pub fn relative_path(&self) -> Result<PathBuf> {
        let unsafe_path = || RgssadError::UnsafePath(self.name.clone());

        if self.name.starts_with([NATIVE_SEPARATOR, '/']) {
            return Err(unsafe_path());
        }

        let mut path = PathBuf::new();
        for (index, component) in self.name.split([NATIVE_SEPARATOR, '/']).enumerate() {
            match component {
                "" | "." => {}
                ".." => return Err(unsafe_path()),
                part if part.contains(':') && (index == 0 || cfg!(windows)) => {
                    return Err(unsafe_path());
                }
                part => path.push(part),
            }
        }

        if path.as_os_str().is_empty() {
            return Err(unsafe_path());
        }
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    fn entry(name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            size: 4,
            payload_offset: 100,
            content_key: 0,
        }
    }

    #[test]
    fn test_end_offset() {
        assert_eq!(entry("a").end_offset(), 104);
    }

    #[test]
    fn test_relative_path_normalizes_separators() {
        let path = entry("Graphics\\Characters\\001-Fighter01.png")
            .relative_path()
            .unwrap();
        assert_eq!(
            path,
            Path::new("Graphics")
                .join("Characters")
                .join("001-Fighter01.png")
        );

        let path = entry("Data\\.\\Map001.rxdata").relative_path().unwrap();
        assert_eq!(path, Path::new("Data").join("Map001.rxdata"));
    }

    #[test]
    fn test_relative_path_rejects_escapes() {
        for name in ["..\\evil.txt", "Data\\..\\..\\x", "\\root.txt", "/etc/passwd", "C:\\x", ""] {
            let err = entry(name).relative_path().unwrap_err();
            assert!(matches!(err, RgssadError::UnsafePath(_)), "{name:?} was accepted");
        }
    }

    #[test]
    fn test_relative_path_colon_outside_first_component() {
        assert!(entry("C:evil.txt").relative_path().is_err());

        let result = entry("Data\\Map 1:2.rxdata").relative_path();
        if cfg!(windows) {
            assert!(matches!(result, Err(RgssadError::UnsafePath(_))));
        } else {
            assert_eq!(result.unwrap(), Path::new("Data").join("Map 1:2.rxdata"));
        }
    }
}

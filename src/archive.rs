//! Single-entry ZIP packaging of the serialized report

use crate::error::{ClusterError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Entry name of the workbook inside the archive
pub const REPORT_ENTRY_NAME: &str = "cluster_output.xlsx";

/// Default file name for the archive itself
pub const ARCHIVE_FILE_NAME: &str = "cluster_output.zip";

/// Compress `contents` into an archive holding the single entry `name`.
///
/// The entry timestamp is pinned to the format epoch (1980-01-01) so the
/// same report always packs to the same bytes.
pub fn pack(name: &str, contents: &[u8]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(name, options)?;
    writer.write_all(contents).map_err(|e| ClusterError::Packaging {
        stage: "archive compression",
        message: e.to_string(),
    })?;
    let archive = writer.finish()?.into_inner();

    tracing::info!(
        entry = name,
        uncompressed = contents.len(),
        compressed = archive.len(),
        "packaged report"
    );
    Ok(archive)
}

/// Read the entry `name` back out of an archive
pub fn unpack_entry(archive: &[u8], name: &str) -> Result<Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(extraction_error)?;
    let mut entry = zip.by_name(name).map_err(extraction_error)?;
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents).map_err(extraction_error)?;
    Ok(contents)
}

fn extraction_error(err: impl std::fmt::Display) -> ClusterError {
    ClusterError::Packaging {
        stage: "archive extraction",
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_then_unpack_returns_exact_bytes() {
        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let archive = pack(REPORT_ENTRY_NAME, &payload).unwrap();

        assert_eq!(unpack_entry(&archive, REPORT_ENTRY_NAME).unwrap(), payload);
    }

    #[test]
    fn test_archive_holds_exactly_one_entry() {
        let archive = pack(REPORT_ENTRY_NAME, b"report").unwrap();
        let zip = ZipArchive::new(Cursor::new(archive.as_slice())).unwrap();

        assert_eq!(zip.len(), 1);
        assert_eq!(zip.file_names().collect::<Vec<_>>(), vec![REPORT_ENTRY_NAME]);
    }

    #[test]
    fn test_packing_is_deterministic() {
        let first = pack(REPORT_ENTRY_NAME, b"same bytes").unwrap();
        let second = pack(REPORT_ENTRY_NAME, b"same bytes").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unpack_missing_entry_is_packaging_error() {
        let archive = pack(REPORT_ENTRY_NAME, b"report").unwrap();
        let result = unpack_entry(&archive, "other.xlsx");
        assert!(matches!(
            result,
            Err(ClusterError::Packaging { stage: "archive extraction", .. })
        ));

        let result = unpack_entry(b"not a zip", REPORT_ENTRY_NAME);
        assert!(matches!(
            result,
            Err(ClusterError::Packaging { stage: "archive extraction", .. })
        ));
    }
}

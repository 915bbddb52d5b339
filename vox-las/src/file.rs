use std::fs::File;
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::error::LasError;
use crate::header::{LasHeader, HEADER_LENGTH};

/// An open LAS file: the decoded header plus a handle used for positional
/// reads. Readers never seek the shared handle, so one `LasFile` can serve
/// any number of worker threads.
#[derive(Debug)]
pub struct LasFile {
    file: File,
    pub header: LasHeader,
}

impl LasFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LasError> {
        let file = File::open(path)?;

        let mut header_bytes = [0u8; HEADER_LENGTH];
        file.read_exact_at(&mut header_bytes, 0)?;
        let header = LasHeader::from_bytes(&header_bytes)?;

        Ok(LasFile { file, header })
    }

    /// Reads the raw record bytes for the half-open point index range
    /// `start..end` in one positional read.
    ///
    /// The buffer is truncated to whole records actually read, so the final
    /// range of a file may legally come back short. Any failure other than
    /// end of file propagates.
    pub fn read_points(&self, start: usize, end: usize) -> Result<Vec<u8>, LasError> {
        let record_length = self.header.point_record_length as usize;
        let offset = self.header.offset_to_points as u64 + (start * record_length) as u64;
        let length = (end - start) * record_length;

        let mut bytes = vec![0u8; length];
        let mut filled = 0;
        while filled < length {
            let n = self.file.read_at(&mut bytes[filled..], offset + filled as u64)?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        bytes.truncate(filled - filled % record_length);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use byteorder::{ByteOrder, LittleEndian};
    use tempfile::NamedTempFile;

    use super::*;

    // Minimal format-0 file: header plus `records` zeroed 20-byte records,
    // each tagged with its index in the raw x field.
    fn write_las(records: u32) -> NamedTempFile {
        let record_length = 20u16;
        let mut bytes = vec![0u8; HEADER_LENGTH];
        bytes[0..4].copy_from_slice(b"LASF");
        LittleEndian::write_u32(&mut bytes[96..100], HEADER_LENGTH as u32);
        bytes[104] = 0;
        LittleEndian::write_u16(&mut bytes[105..107], record_length);
        LittleEndian::write_u32(&mut bytes[107..111], records);
        for i in 0..3 {
            LittleEndian::write_f64(&mut bytes[131 + i * 8..139 + i * 8], 1.0);
        }

        for i in 0..records {
            let mut record = vec![0u8; record_length as usize];
            LittleEndian::write_i32(&mut record[0..4], i as i32);
            bytes.extend_from_slice(&record);
        }

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    #[test]
    fn test_read_points_returns_exact_range() {
        let file = write_las(10);
        let las = LasFile::open(file.path()).unwrap();

        let bytes = las.read_points(2, 5).unwrap();
        assert_eq!(bytes.len(), 3 * 20);
        assert_eq!(LittleEndian::read_i32(&bytes[0..4]), 2);
        assert_eq!(LittleEndian::read_i32(&bytes[40..44]), 4);
    }

    #[test]
    fn test_read_points_tolerates_short_final_range() {
        let file = write_las(4);
        let las = LasFile::open(file.path()).unwrap();

        // Range runs past the end of the file; only whole records come back.
        let bytes = las.read_points(2, 8).unwrap();
        assert_eq!(bytes.len(), 2 * 20);
        assert_eq!(LittleEndian::read_i32(&bytes[0..4]), 2);
    }

    #[test]
    fn test_open_missing_file_is_an_io_error() {
        let result = LasFile::open("/nonexistent/input.las");
        assert!(matches!(result, Err(LasError::Io(_))));
    }
}

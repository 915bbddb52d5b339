use byteorder::{ByteOrder, LittleEndian};

use crate::error::LasError;

/// Byte length of the fixed portion of a LAS 1.x public header block.
pub const HEADER_LENGTH: usize = 227;

/// LAS point record formats this reader understands.
///
/// Later formats append fields after the shared 20-byte core, which moves
/// the point source id relative to the end of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    Format0,
    Format1,
    Format2,
    Format3,
}

impl PointFormat {
    pub fn from_id(id: u8) -> Result<Self, LasError> {
        match id {
            0 => Ok(PointFormat::Format0),
            1 => Ok(PointFormat::Format1),
            2 => Ok(PointFormat::Format2),
            3 => Ok(PointFormat::Format3),
            other => Err(LasError::UnsupportedPointFormat(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            PointFormat::Format0 => 0,
            PointFormat::Format1 => 1,
            PointFormat::Format2 => 2,
            PointFormat::Format3 => 3,
        }
    }

    /// Offset of the point source id, counted back from the record end.
    ///
    /// Format 0 ends with the id; format 1 appends GPS time (8 bytes),
    /// format 2 appends RGB (6 bytes), format 3 appends both.
    pub fn source_offset_from_end(self) -> usize {
        match self {
            PointFormat::Format0 => 2,
            PointFormat::Format1 => 10,
            PointFormat::Format2 => 8,
            PointFormat::Format3 => 16,
        }
    }

    /// Fixed record length of the format, the smallest a conforming header
    /// may declare.
    pub fn min_record_length(self) -> u16 {
        match self {
            PointFormat::Format0 => 20,
            PointFormat::Format1 => 28,
            PointFormat::Format2 => 26,
            PointFormat::Format3 => 34,
        }
    }
}

/// The subset of the LAS public header this pipeline consumes.
#[derive(Debug, Clone)]
pub struct LasHeader {
    pub number_of_points: u32,
    pub offset_to_points: u32,
    pub point_record_length: u16,
    pub point_format: PointFormat,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl LasHeader {
    /// Decodes the consumed fields from the raw header block.
    ///
    /// Field positions follow the LAS 1.0–1.3 fixed layout: the point data
    /// offset at byte 96, format id at 104, record length at 105, point
    /// count at 107, then the scale / offset / bounds doubles from 131.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LasError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(LasError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "LAS header block is truncated",
            )));
        }

        let offset_to_points = LittleEndian::read_u32(&bytes[96..100]);
        let format_id = bytes[104];
        let point_record_length = LittleEndian::read_u16(&bytes[105..107]);
        let number_of_points = LittleEndian::read_u32(&bytes[107..111]);

        let scale = read_f64_triplet(&bytes[131..155]);
        let offset = read_f64_triplet(&bytes[155..179]);

        // Bounds are stored as interleaved max/min pairs per axis.
        let max_x = LittleEndian::read_f64(&bytes[179..187]);
        let min_x = LittleEndian::read_f64(&bytes[187..195]);
        let max_y = LittleEndian::read_f64(&bytes[195..203]);
        let min_y = LittleEndian::read_f64(&bytes[203..211]);
        let max_z = LittleEndian::read_f64(&bytes[211..219]);
        let min_z = LittleEndian::read_f64(&bytes[219..227]);

        let point_format = PointFormat::from_id(format_id)?;
        if point_record_length < point_format.min_record_length() {
            return Err(LasError::RecordLengthTooShort {
                length: point_record_length,
                format: format_id,
            });
        }

        Ok(LasHeader {
            number_of_points,
            offset_to_points,
            point_record_length,
            point_format,
            scale,
            offset,
            min: [min_x, min_y, min_z],
            max: [max_x, max_y, max_z],
        })
    }
}

fn read_f64_triplet(bytes: &[u8]) -> [f64; 3] {
    [
        LittleEndian::read_f64(&bytes[0..8]),
        LittleEndian::read_f64(&bytes[8..16]),
        LittleEndian::read_f64(&bytes[16..24]),
    ]
}

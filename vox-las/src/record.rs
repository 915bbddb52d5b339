use byteorder::{ByteOrder, LittleEndian};

use crate::header::{LasHeader, PointFormat};

/// Decodes the world-space coordinates of one point record.
///
/// The first 12 bytes of every supported format are the X/Y/Z lattice values
/// as little-endian `i32`; the real coordinate is `value * scale + offset`
/// per axis.
pub fn decode_point_xyz(record: &[u8], header: &LasHeader) -> [f64; 3] {
    let x = LittleEndian::read_i32(&record[0..4]) as f64;
    let y = LittleEndian::read_i32(&record[4..8]) as f64;
    let z = LittleEndian::read_i32(&record[8..12]) as f64;

    [
        x * header.scale[0] + header.offset[0],
        y * header.scale[1] + header.offset[1],
        z * header.scale[2] + header.offset[2],
    ]
}

/// Decodes the point source id of one record, located by counting back from
/// the record end per format.
pub fn decode_point_source(record: &[u8], format: PointFormat) -> u32 {
    let start = record.len() - format.source_offset_from_end();
    LittleEndian::read_u16(&record[start..start + 2]) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::LasHeader;

    fn test_header() -> LasHeader {
        LasHeader {
            number_of_points: 0,
            offset_to_points: 227,
            point_record_length: 34,
            point_format: PointFormat::Format3,
            scale: [0.01, 0.01, 0.001],
            offset: [100.0, 200.0, 300.0],
            min: [100.0, 200.0, 300.0],
            max: [110.0, 220.0, 330.0],
        }
    }

    #[test]
    fn test_decode_xyz_applies_scale_and_offset() {
        let mut record = vec![0u8; 34];
        LittleEndian::write_i32(&mut record[0..4], 150);
        LittleEndian::write_i32(&mut record[4..8], -50);
        LittleEndian::write_i32(&mut record[8..12], 2500);

        let [x, y, z] = decode_point_xyz(&record, &test_header());
        assert_eq!(x, 101.5);
        assert_eq!(y, 199.5);
        assert_eq!(z, 302.5);
    }

    #[test]
    fn test_decode_source_format3_record() {
        // 34-byte format-3 record: the source id sits at bytes 18..20.
        let mut record = vec![0u8; 34];
        record[18] = 0x2A;
        record[19] = 0x00;
        assert_eq!(decode_point_source(&record, PointFormat::Format3), 42);
    }

    #[test]
    fn test_decode_source_all_formats() {
        let cases = [
            (PointFormat::Format0, 20usize),
            (PointFormat::Format1, 28),
            (PointFormat::Format2, 26),
            (PointFormat::Format3, 34),
        ];

        for (format, record_length) in cases {
            let mut record = vec![0u8; record_length];
            let start = record_length - format.source_offset_from_end();
            LittleEndian::write_u16(&mut record[start..start + 2], 513);
            assert_eq!(decode_point_source(&record, format), 513);
        }
    }
}

use crate::model::Coordinate;
use thiserror::Error;

/// precision used by the Valhalla routing engine when encoding leg shapes.
pub const SHAPE_PRECISION: u32 = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("encoded polyline ends mid-value at byte offset {0}")]
    Truncated(usize),
    #[error("invalid character '{0}' in encoded polyline at byte offset {1}")]
    InvalidCharacter(char, usize),
}

/// decodes a delta-encoded polyline string into coordinates.
///
/// `precision` is the number of decimal places encoded per coordinate
/// component (5 for the original Google encoding, 6 for Valhalla shapes).
/// decoding is deterministic: the same input always yields the same
/// sequence.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, DecodeError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut offset: usize = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points: Vec<Coordinate> = Vec::new();
    while offset < bytes.len() {
        lat += next_value(bytes, &mut offset)?;
        lon += next_value(bytes, &mut offset)?;
        points.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
    }
    Ok(points)
}

/// reads one zigzag varint-encoded delta from the byte stream, advancing
/// `offset` past the consumed characters.
fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *bytes
            .get(*offset)
            .ok_or(DecodeError::Truncated(*offset))?;
        if !(63..=126).contains(&byte) {
            return Err(DecodeError::InvalidCharacter(byte as char, *offset));
        }
        *offset += 1;
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        if chunk < 0x20 {
            break;
        }
        shift += 5;
    }
    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

/// encodes coordinates into a delta-encoded polyline string, the inverse
/// of [`decode`]. used to synthesize route shapes in tests and demos.
pub fn encode(points: &[(f64, f64)], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut out = String::new();
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);
    for (lat, lon) in points {
        let lat_e = (lat * factor).round() as i64;
        let lon_e = (lon * factor).round() as i64;
        encode_value(lat_e - prev_lat, &mut out);
        encode_value(lon_e - prev_lon, &mut out);
        prev_lat = lat_e;
        prev_lon = lon_e;
    }
    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((0x20 | (v & 0x1f)) + 63) as u8) as char);
        v >>= 5;
    }
    out.push(((v + 63) as u8) as char);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_known_google_example() {
        let decoded = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(decoded.len(), expected.len());
        for (point, (lat, lon)) in decoded.iter().zip(expected) {
            assert!((point.lat - lat).abs() < 1e-5);
            assert!((point.lon - lon).abs() < 1e-5);
        }
    }

    #[test]
    fn test_decode_precision_6_round_trip() {
        let points = [
            (39.7392, -104.9903),
            (39.739852, -104.984722),
            (39.742043, -104.987741),
        ];
        let encoded = encode(&points, 6);
        let decoded = decode(&encoded, 6).unwrap();
        for (point, (lat, lon)) in decoded.iter().zip(points) {
            assert!((point.lat - lat).abs() < 1e-6);
            assert!((point.lon - lon).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decode_is_idempotent() {
        let encoded = encode(&[(40.7128, -74.0060), (41.8781, -87.6298)], 6);
        let first = decode(&encoded, 6).unwrap();
        let second = decode(&encoded, 6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_empty_yields_no_points() {
        assert_eq!(decode("", 6).unwrap(), vec![]);
    }

    #[test]
    fn test_decode_truncated_input_fails() {
        // a single encoded latitude with no trailing longitude
        let mut encoded = String::new();
        encode_value(3850000, &mut encoded);
        let result = decode(&encoded, 5);
        assert!(matches!(result, Err(DecodeError::Truncated(_))));
    }

    #[test]
    fn test_decode_invalid_character_fails() {
        let result = decode("_p~iF ~ps|U", 5);
        assert!(matches!(result, Err(DecodeError::InvalidCharacter(' ', _))));
    }
}

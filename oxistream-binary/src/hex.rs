//! Hexadecimal encoding helpers.
//!
//! Encoding is uppercase with an optional separator between bytes.
//! Decoding is tolerant: characters that are not hex digits are
//! skipped, so `"DE:AD beef"` decodes the same as `"DEADBEEF"`. A
//! trailing unpaired digit is dropped.

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encode `data` as uppercase hex, inserting `join` between bytes
/// when given.
///
/// # Example
///
/// ```
/// use oxistream_binary::hex;
///
/// assert_eq!(hex::encode(&[0xDE, 0xAD], None), "DEAD");
/// assert_eq!(hex::encode(&[0xDE, 0xAD], Some(":")), "DE:AD");
/// ```
pub fn encode(data: &[u8], join: Option<&str>) -> String {
    let mut result = String::with_capacity(data.len() * 2);

    for &byte in data {
        if let Some(sep) = join {
            if !result.is_empty() {
                result.push_str(sep);
            }
        }
        result.push(DIGITS[usize::from(byte >> 4)] as char);
        result.push(DIGITS[usize::from(byte & 0x0F)] as char);
    }

    result
}

/// Decode hex digits from `text`, ignoring everything else.
pub fn decode(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() / 2);
    let mut high: Option<u8> = None;

    for ch in text.bytes() {
        let Some(digit) = digit_value(ch) else {
            continue;
        };
        match high.take() {
            None => high = Some(digit),
            Some(high) => result.push((high << 4) | digit),
        }
    }

    result
}

/// Decode hex digits from `text` into `out`, stopping when `out` is
/// full. Returns the number of bytes written.
pub fn decode_into(text: &str, out: &mut [u8]) -> usize {
    let mut written = 0;
    let mut high: Option<u8> = None;

    for ch in text.bytes() {
        if written == out.len() {
            break;
        }
        let Some(digit) = digit_value(ch) else {
            continue;
        };
        match high.take() {
            None => high = Some(digit),
            Some(high) => {
                out[written] = (high << 4) | digit;
                written += 1;
            }
        }
    }

    written
}

fn digit_value(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(&[], None), "");
        assert_eq!(encode(&[0x00, 0xFF, 0x5A], None), "00FF5A");
        assert_eq!(encode(&[0x01, 0x02, 0x03], Some("-")), "01-02-03");
    }

    #[test]
    fn test_decode_tolerates_separators_and_case() {
        assert_eq!(decode("00ff5a"), vec![0x00, 0xFF, 0x5A]);
        assert_eq!(decode("DE:AD be ef"), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode(""), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_drops_trailing_nibble() {
        assert_eq!(decode("ABC"), vec![0xAB]);
    }

    #[test]
    fn test_decode_into_stops_at_capacity() {
        let mut out = [0u8; 2];
        assert_eq!(decode_into("0102 0304", &mut out), 2);
        assert_eq!(out, [0x01, 0x02]);
    }

    #[test]
    fn test_roundtrip_with_join() {
        let data = [0x13u8, 0x37, 0x00, 0xEE];
        assert_eq!(decode(&encode(&data, Some(", "))), data);
    }
}

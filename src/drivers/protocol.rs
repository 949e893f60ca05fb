use thiserror::Error;
/// Why a raw line was rejected. Rejected lines never reach the capture buffer.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    #[error("line is not valid UTF-8")]
    Encoding,
    #[error("expected 2 comma-separated fields, got {0}")]
    FieldCount(usize),
    #[error("ECG field {0:?} is not an integer")]
    Ecg(String),
    #[error("accelerometer field {0:?} is not a number")]
    Accel(String),
    #[error("line exceeded {0} bytes without a newline")]
    TooLong(usize),
}
/// One decoded `"<int>,<float>"` line, before it is stamped with a capture time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub ecg: i64,
    pub accel: f64,
}
pub fn parse_line(raw: &[u8]) -> Result<Reading, LineError> {
    let text = std::str::from_utf8(raw).map_err(|_| LineError::Encoding)?;
    let fields: Vec<&str> = text.trim().split(',').collect();
    if fields.len() != 2 {
        return Err(LineError::FieldCount(fields.len()));
    }
    let ecg_field = fields[0].trim();
    let accel_field = fields[1].trim();
    let ecg = ecg_field
        .parse::<i64>()
        .map_err(|_| LineError::Ecg(ecg_field.to_string()))?;
    let accel = accel_field
        .parse::<f64>()
        .map_err(|_| LineError::Accel(accel_field.to_string()))?;
    Ok(Reading { ecg, accel })
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_well_formed_line_with_crlf() {
        let reading = parse_line(b"512,0.25\r\n").unwrap();
        assert_eq!(reading.ecg, 512);
        assert_eq!(reading.accel, 0.25);
    }
    #[test]
    fn tolerates_padding_and_signs() {
        let reading = parse_line(b"  -17 , +1.5e2 \n").unwrap();
        assert_eq!(reading.ecg, -17);
        assert_eq!(reading.accel, 150.0);
    }
    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(parse_line(b"512\n"), Err(LineError::FieldCount(1)));
        assert_eq!(parse_line(b"1,2,3\n"), Err(LineError::FieldCount(3)));
        assert_eq!(parse_line(b"\n"), Err(LineError::FieldCount(1)));
    }
    #[test]
    fn rejects_non_integer_ecg() {
        assert_eq!(
            parse_line(b"51.2,0.1\n"),
            Err(LineError::Ecg("51.2".into()))
        );
    }
    #[test]
    fn rejects_non_numeric_accel() {
        assert_eq!(
            parse_line(b"512,abc\n"),
            Err(LineError::Accel("abc".into()))
        );
    }
    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(parse_line(&[0xff, 0xfe, b',', b'1']), Err(LineError::Encoding));
    }
}

//! Sample line parsing

use blink_engine::EarSample;

use crate::ReplayError;

/// Parse one input line into a sample.
///
/// Accepts a JSON object (`{"left_ear":0.3,"right_ear":0.29,"timestamp":1.25}`)
/// or a comma-separated `left_ear,right_ear,timestamp` triple. Blank lines and
/// `#` comments yield `Ok(None)`.
pub fn parse_sample(line: &str) -> Result<Option<EarSample>, ReplayError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('{') {
        return Ok(Some(serde_json::from_str(line)?));
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [left, right, timestamp] = fields.as_slice() else {
        return Err(ReplayError::InvalidSample(format!(
            "expected 3 comma-separated fields, got {}",
            fields.len()
        )));
    };

    let number = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|e| ReplayError::InvalidSample(format!("{field:?}: {e}")))
    };

    Ok(Some(EarSample {
        left_ear: number(*left)?,
        right_ear: number(*right)?,
        timestamp: number(*timestamp)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_line() {
        let sample = parse_sample(r#"{"left_ear": 0.31, "right_ear": 0.29, "timestamp": 1.5}"#)
            .unwrap()
            .unwrap();
        assert_eq!(sample.left_ear, 0.31);
        assert_eq!(sample.right_ear, 0.29);
        assert_eq!(sample.timestamp, 1.5);
    }

    #[test]
    fn test_parse_csv_line() {
        let sample = parse_sample("0.1, 0.12, 3.25").unwrap().unwrap();
        assert_eq!(sample.right_ear, 0.12);
        assert_eq!(sample.timestamp, 3.25);
    }

    #[test]
    fn test_skips_blank_and_comment() {
        assert!(parse_sample("   ").unwrap().is_none());
        assert!(parse_sample("# left,right,t").unwrap().is_none());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            parse_sample("0.1,0.2"),
            Err(ReplayError::InvalidSample(_))
        ));
        assert!(matches!(
            parse_sample("0.1,abc,0.3"),
            Err(ReplayError::InvalidSample(_))
        ));
        assert!(matches!(
            parse_sample(r#"{"left_ear": 0.1}"#),
            Err(ReplayError::Serialize(_))
        ));
    }
}

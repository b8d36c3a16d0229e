//! Machine-readable fetch reports

use std::io::Write;

use anyhow::Result;

use crate::fetch::FetchReport;

/// Write reports as a prettified JSON array.
pub fn write_json_pretty(reports: &[FetchReport], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write reports as newline-delimited JSON (NDJSON).
pub fn write_ndjson(reports: &[FetchReport], mut w: impl Write) -> Result<()> {
    for report in reports {
        let line = serde_json::to_string(report)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_report(name: &str) -> FetchReport {
        FetchReport {
            name: name.to_string(),
            url: format!("https://fonts.example/{name}.zip"),
            archive: PathBuf::from(".vesti-dummy/font.zip"),
            destination: PathBuf::from(".vesti-dummy"),
            extracted: vec![PathBuf::from(format!("{name}-Regular.otf"))],
            bytes: 42,
        }
    }

    #[test]
    fn ndjson_writes_one_line_per_report() {
        let reports = vec![sample_report("A"), sample_report("B")];
        let mut buf = Vec::new();

        write_ndjson(&reports, &mut buf).expect("write ndjson");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FetchReport = serde_json::from_str(lines[1]).expect("parse");
        assert_eq!(parsed, sample_report("B"));
    }

    #[test]
    fn json_is_a_single_array() {
        let reports = vec![sample_report("A")];
        let mut buf = Vec::new();

        write_json_pretty(&reports, &mut buf).expect("write json");

        let value: serde_json::Value = serde_json::from_slice(&buf).expect("parse");
        let arr = value.as_array().expect("array");
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["extracted"][0], "A-Regular.otf");
    }
}

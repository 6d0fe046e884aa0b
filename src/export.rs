use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{InsightError, Result};
use crate::model::{
    GroupedRecord, InsightRecord, CUSTOMER_COLUMN, INSIGHT_COLUMN, MESSAGE_COLUMN, SENTIMENT_COLUMN,
};

/// A row type that can be exported as a CSV table.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

impl TableRow for InsightRecord {
    const HEADERS: &'static [&'static str] =
        &[CUSTOMER_COLUMN, MESSAGE_COLUMN, INSIGHT_COLUMN, SENTIMENT_COLUMN];
}

impl TableRow for GroupedRecord {
    const HEADERS: &'static [&'static str] =
        &[CUSTOMER_COLUMN, MESSAGE_COLUMN, INSIGHT_COLUMN, SENTIMENT_COLUMN];
}

/// UTF-8 CSV: header row, then one row per record, no index column.
///
/// The header is written even for an empty table.
pub fn to_csv_bytes<T: TableRow>(rows: &[T]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(T::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| InsightError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

pub fn write_csv<T: TableRow, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    info!("💾 Writing {} rows to CSV: {}", rows.len(), path.as_ref().display());
    let bytes = to_csv_bytes(rows)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// One JSON object per line (debugging / portability).
pub fn write_jsonl<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    info!("🧾 Writing JSONL: {}", path.as_ref().display());
    let mut f = BufWriter::new(File::create(path)?);
    for row in rows {
        writeln!(f, "{}", serde_json::to_string(row)?)?;
    }
    f.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(customer: &str, insight: &str) -> InsightRecord {
        InsightRecord {
            customer: customer.into(),
            message: "msg".into(),
            insight: insight.into(),
            sentiment: "Unknown".into(),
        }
    }

    #[test]
    fn empty_table_still_has_header() {
        let bytes = to_csv_bytes::<InsightRecord>(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Customer,Message,AI Insight,Sentiment\n"
        );
    }

    #[test]
    fn quotes_embedded_commas_newlines_and_quotes() {
        let rows = vec![
            rec("Ana", "Summary: late, very late\nSentiment: Negative"),
            rec("Ben", "He said \"thanks\""),
            rec("Cleo", "plain"),
        ];
        let bytes = to_csv_bytes(&rows).unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let back: Vec<InsightRecord> = rdr.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(back, rows);
        assert_eq!(
            rdr.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["Customer", "Message", "AI Insight", "Sentiment"]
        );
    }

    #[test]
    fn grouped_rows_use_same_headers() {
        let rows = vec![GroupedRecord {
            customer: "Ana".into(),
            messages: "hi | bye".into(),
            insights: "a | b".into(),
            sentiments: "Positive, Unknown".into(),
        }];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        assert_eq!(
            text,
            "Customer,Message,AI Insight,Sentiment\nAna,hi | bye,a | b,\"Positive, Unknown\"\n"
        );
    }

    #[test]
    fn jsonl_has_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        write_jsonl(&[rec("Ana", "x"), rec("Ben", "y\nz")], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["AI Insight"], "y\nz");
    }
}

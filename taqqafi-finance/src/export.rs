//! Write approved transactions as a CSV spreadsheet.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use taqqafi_core::Transaction;

pub const HEADER: [&str; 9] = [
    "id", "date", "merchant", "category", "amount", "currency", "direction", "sender", "raw_text",
];

/// One CSV row. Field order must match `HEADER`.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    date: String,
    merchant: &'a str,
    category: &'a str,
    amount: String,
    currency: &'a str,
    direction: &'a str,
    sender: &'a str,
    raw_text: &'a str,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: &tx.id,
            date: tx.approved_at.format("%Y-%m-%d").to_string(),
            merchant: &tx.merchant,
            category: tx.category.as_str(),
            amount: format!("{:.2}", tx.amount),
            currency: tx.currency.as_str(),
            direction: tx.direction.as_str(),
            sender: &tx.sender,
            raw_text: &tx.raw_text,
        }
    }
}

/// Serialize `txns` with a header row into any writer.
pub fn write_csv<W: Write>(writer: W, txns: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tx in txns {
        wtr.serialize(ExportRow::from(tx))?;
    }
    if txns.is_empty() {
        wtr.write_record(HEADER)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv(path: impl AsRef<Path>, txns: &[Transaction]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, txns).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taqqafi_core::{Category, ContentHash, CurrencyCode, Direction};

    const RAW: &str = "Al-Rajhi Bank: SAR 89.50 deducted";

    fn sample(merchant: &str, amount: f64) -> Transaction {
        Transaction {
            id: "tx-1".into(),
            hash: ContentHash::from_hex("00ff"),
            amount,
            currency: CurrencyCode::Sar,
            merchant: merchant.into(),
            category: Category::Food,
            direction: Direction::Debit,
            raw_text: RAW.into(),
            sender: "ALRAJHI".into(),
            approved_at: Utc.with_ymd_and_hms(2026, 2, 25, 9, 30, 0).unwrap(),
            month: 2,
            year: 2026,
        }
    }

    fn render(txns: &[Transaction]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, txns).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_row() {
        let out = render(&[sample("Kfc", 89.5)]);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,merchant,category,amount,currency,direction,sender,raw_text")
        );
        assert_eq!(
            lines.next(),
            Some("tx-1,2026-02-25,Kfc,Food,89.50,SAR,debit,ALRAJHI,Al-Rajhi Bank: SAR 89.50 deducted")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_quotes_commas() {
        let out = render(&[sample("Jarir, Olaya", 10.0)]);
        assert!(out.contains("\"Jarir, Olaya\""));
    }

    #[test]
    fn test_raw_text_survives_verbatim() {
        let mut tx = sample("Uber", 18.44);
        tx.raw_text = "Purchase of 18.44 USD, \"UBER\"\nbalance 984.862 JOD".into();
        let out = render(std::slice::from_ref(&tx));

        let mut rdr = csv::Reader::from_reader(out.as_bytes());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER);
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(record.get(8), Some(tx.raw_text.as_str()));
    }

    #[test]
    fn test_empty_still_has_header() {
        assert_eq!(
            render(&[]),
            "id,date,merchant,category,amount,currency,direction,sender,raw_text\n"
        );
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("taqqafi-export-{}.csv", std::process::id()));
        export_csv(&path, &[sample("مطعم البيك", 350.0)]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(written.contains("مطعم البيك"));
        assert!(written.contains("350.00"));
    }
}

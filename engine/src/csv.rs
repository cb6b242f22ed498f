//! CSV rendering of the sales log.
//!
//! The export contract is fixed for compatibility with existing spreadsheet
//! workflows: `Date/Time,Price,Quantity,Paid,Total,Change`, one row per
//! record, `Paid` and `Change` left blank for legacy records that predate
//! payment tracking.

use crate::record::{reference_tz, SaleRecord};

/// File name offered for the download/export.
pub const SALES_CSV_FILENAME: &str = "sales_records.csv";

const HEADER: &str = "Date/Time,Price,Quantity,Paid,Total,Change";

/// Render the sales log as CSV, oldest sale first.
pub fn render_csv(records: &[SaleRecord]) -> String {
    let mut sorted: Vec<&SaleRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let mut out = String::from(HEADER);
    out.push('\n');
    for record in sorted {
        let when = record
            .timestamp
            .with_timezone(&reference_tz())
            .format("%Y-%m-%d %H:%M:%S");
        let paid = record
            .paid
            .map(|p| p.to_decimal_string())
            .unwrap_or_default();
        let change = record
            .change()
            .map(|c| c.to_decimal_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            when,
            record.price.price_in_pesos(),
            record.quantity,
            paid,
            record.total().to_decimal_string(),
            change,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{money::Pesos, tier::PriceTier};
    use chrono::{TimeZone, Utc};

    #[test]
    fn header_only_for_empty_log() {
        let csv = render_csv(&[]);
        assert_eq!(csv, "Date/Time,Price,Quantity,Paid,Total,Change\n");
    }

    #[test]
    fn one_row_per_record_oldest_first() {
        let later = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 6, 14, 18, 30, 0).unwrap();

        let records = vec![
            SaleRecord::new("b", PriceTier::P99, 1, Some(Pesos::from_pesos(100)), later),
            SaleRecord::new("a", PriceTier::P69, 3, Some(Pesos::from_pesos(250)), earlier),
        ];

        let csv = render_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        // 18:30 UTC is 11:30 at UTC-7
        assert_eq!(lines[1], "2025-06-14 11:30:00,69,3,250.00,207.00,43.00");
        assert_eq!(lines[2], "2025-06-15 14:00:00,99,1,100.00,99.00,1.00");
    }

    #[test]
    fn legacy_record_leaves_paid_and_change_blank() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let records = vec![SaleRecord::new("a", PriceTier::P69, 2, None, now)];

        let csv = render_csv(&records);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2025-06-15 14:00:00,69,2,,138.00,");
    }
}

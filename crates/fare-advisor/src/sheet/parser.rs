use serde::Deserialize;
use std::io::Read;

use super::domain::FareSheetRow;

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<FareSheetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<SheetRow>() {
        let row = record?;
        rows.push(FareSheetRow {
            operator: row.operator,
            service_id: row.service_id,
            current_fare: row.current_fare,
            occupancy: row.occupancy,
            market_min: row.market_min,
            market_max: row.market_max,
            demand_percentile: row.demand_percentile,
        });
    }

    Ok(rows)
}

/// Column layout of an exported fare sheet; unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct SheetRow {
    operator: String,
    service_id: String,
    current_fare: f64,
    occupancy: f64,
    market_min: f64,
    market_max: f64,
    demand_percentile: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_and_ignores_extra_columns() {
        let csv = "operator,service_id,route,current_fare,occupancy,market_min,market_max,demand_percentile\n\
 Zing Bus , 101 ,Delhi-Jaipur, 600 ,45,550,750,80\n";
        let rows = parse_rows(Cursor::new(csv)).expect("rows parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].operator, "Zing Bus");
        assert_eq!(rows[0].service_id, "101");
        assert_eq!(rows[0].current_fare, 600.0);
        assert_eq!(rows[0].demand_percentile, 80.0);
    }

    #[test]
    fn non_numeric_fare_is_a_csv_error() {
        let csv = "operator,service_id,current_fare,occupancy,market_min,market_max,demand_percentile\n\
Zing Bus,101,six hundred,45,550,750,80\n";
        assert!(parse_rows(Cursor::new(csv)).is_err());
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let csv = "operator,service_id,current_fare\nZing Bus,101,600\n";
        assert!(parse_rows(Cursor::new(csv)).is_err());
    }
}

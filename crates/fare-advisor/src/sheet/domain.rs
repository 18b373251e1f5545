use serde::Serialize;

use crate::pricing::FareQuoteInput;

/// One service row of an operator fare sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareSheetRow {
    pub operator: String,
    pub service_id: String,
    pub current_fare: f64,
    pub occupancy: f64,
    pub market_min: f64,
    pub market_max: f64,
    pub demand_percentile: f64,
}

impl FareSheetRow {
    pub fn quote_input(&self) -> FareQuoteInput {
        FareQuoteInput {
            current_fare: self.current_fare,
            occupancy_pct: self.occupancy,
            market_fare_min: self.market_min,
            market_fare_max: self.market_max,
            demand_percentile: self.demand_percentile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetLookupError {
    #[error("sheet has no rows to select from")]
    EmptySheet,
    #[error("operator '{operator}' not found in sheet")]
    UnknownOperator { operator: String },
    #[error("service '{service_id}' not found for operator '{operator}'")]
    NotFound {
        operator: String,
        service_id: String,
    },
}

/// Operator with the service ids listed for it, in sheet order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorServices {
    pub operator: String,
    pub service_ids: Vec<String>,
}

/// Rows loaded from a fare sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FareSheet {
    rows: Vec<FareSheetRow>,
}

impl FareSheet {
    pub fn new(rows: Vec<FareSheetRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FareSheetRow] {
        &self.rows
    }

    /// Unique operators in first-seen order.
    pub fn operators(&self) -> Vec<&str> {
        let mut operators: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !operators.contains(&row.operator.as_str()) {
                operators.push(&row.operator);
            }
        }
        operators
    }

    pub fn service_ids(&self, operator: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.operator == operator)
            .map(|row| row.service_id.as_str())
            .collect()
    }

    pub fn catalog(&self) -> Vec<OperatorServices> {
        self.operators()
            .into_iter()
            .map(|operator| OperatorServices {
                operator: operator.to_string(),
                service_ids: self
                    .service_ids(operator)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    /// First row matching both keys.
    pub fn find(
        &self,
        operator: &str,
        service_id: &str,
    ) -> Result<&FareSheetRow, SheetLookupError> {
        self.rows
            .iter()
            .find(|row| row.operator == operator && row.service_id == service_id)
            .ok_or_else(|| SheetLookupError::NotFound {
                operator: operator.to_string(),
                service_id: service_id.to_string(),
            })
    }

    /// Resolves a selection, falling back to the first operator and its first service.
    pub fn select(
        &self,
        operator: Option<&str>,
        service_id: Option<&str>,
    ) -> Result<&FareSheetRow, SheetLookupError> {
        let operator = match operator {
            Some(operator) => operator,
            None => self
                .operators()
                .first()
                .copied()
                .ok_or(SheetLookupError::EmptySheet)?,
        };

        let service_ids = self.service_ids(operator);
        if service_ids.is_empty() {
            return Err(SheetLookupError::UnknownOperator {
                operator: operator.to_string(),
            });
        }

        let service_id = service_id.unwrap_or(service_ids[0]);
        self.find(operator, service_id)
    }
}

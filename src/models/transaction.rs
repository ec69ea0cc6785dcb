use chrono::NaiveDate;
use serde::Deserialize;

/// One trade quote as it appears in a league export.
///
/// Every column is optional so that a short or ragged row still deserializes;
/// validation happens in the ingestor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransactionRecord {
    #[serde(rename = "League")]
    pub league: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Get")]
    pub get: Option<String>,
    #[serde(rename = "Pay")]
    pub pay: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "Confidence")]
    pub confidence: Option<String>,
}

impl RawTransactionRecord {
    pub fn is_paid_in(&self, currency: &str) -> bool {
        self.pay.as_deref() == Some(currency)
    }

    /// The exchange value, if it is a finite number.
    pub fn price(&self) -> Option<f64> {
        self.value
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// A retained quote, before it is placed on its league's day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub key: String,
    pub date: NaiveDate,
    pub price: f64,
    pub display_name: String,
}

/// A retained quote placed on its league's day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub key: String,
    pub day: u32,
    pub price: f64,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pay: &str, value: &str) -> RawTransactionRecord {
        RawTransactionRecord {
            league: Some("Settlers".to_string()),
            date: Some("2024-07-26".to_string()),
            get: Some("Divine Orb".to_string()),
            pay: Some(pay.to_string()),
            value: Some(value.to_string()),
            confidence: Some("High".to_string()),
        }
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(record("Chaos Orb", "152.5").price(), Some(152.5));
        assert_eq!(record("Chaos Orb", " 7 ").price(), Some(7.0));
        assert_eq!(record("Chaos Orb", "NaN").price(), None);
        assert_eq!(record("Chaos Orb", "inf").price(), None);
        assert_eq!(record("Chaos Orb", "").price(), None);
        assert_eq!(RawTransactionRecord::default().price(), None);
    }

    #[test]
    fn test_paid_in_is_exact() {
        assert!(record("Chaos Orb", "1").is_paid_in("Chaos Orb"));
        assert!(!record("chaos orb", "1").is_paid_in("Chaos Orb"));
        assert!(!record("Divine Orb", "1").is_paid_in("Chaos Orb"));
    }
}

//! Market data seam for filling in prices and lot sizes
//!
//! Quote lookups are an external, possibly failing collaborator. Failures never
//! block allocation: the affected field is simply left as it was.

use crate::allocation::AllocationRow;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a quote source may report
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Quote source unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),
}

/// Reference data for one listed instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub lot_size: Option<u32>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
}

/// One constituent of a market index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexComponent {
    pub ticker: String,
    /// Share of the index, in percent
    pub weight: Decimal,
}

/// Source of last prices and instrument reference data
pub trait QuoteSource {
    /// Last traded price, or `None` when the source has no trade for it
    fn last_price(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError>;

    /// Instruments matching `query` by ticker or name; all when `None`
    fn search(&self, query: Option<&str>) -> Result<Vec<StockInfo>, QuoteError>;

    /// Constituents of the tracked index, in source order
    fn index_components(&self) -> Result<Vec<IndexComponent>, QuoteError>;
}

/// In-memory quote source
#[derive(Debug, Clone, Default)]
pub struct StaticQuotes {
    stocks: Vec<StockInfo>,
    index: Vec<IndexComponent>,
}

impl StaticQuotes {
    pub fn new(stocks: Vec<StockInfo>) -> Self {
        Self {
            stocks,
            index: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: Vec<IndexComponent>) -> Self {
        self.index = index;
        self
    }
}

impl QuoteSource for StaticQuotes {
    fn last_price(&self, ticker: &str) -> Result<Option<Decimal>, QuoteError> {
        self.stocks
            .iter()
            .find(|s| s.ticker.eq_ignore_ascii_case(ticker))
            .map(|s| s.last_price)
            .ok_or_else(|| QuoteError::UnknownTicker(ticker.to_string()))
    }

    fn search(&self, query: Option<&str>) -> Result<Vec<StockInfo>, QuoteError> {
        let Some(query) = query else {
            return Ok(self.stocks.clone());
        };
        let query = query.to_lowercase();
        Ok(self
            .stocks
            .iter()
            .filter(|s| {
                s.ticker.to_lowercase().contains(&query) || s.name.to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    fn index_components(&self) -> Result<Vec<IndexComponent>, QuoteError> {
        Ok(self.index.clone())
    }
}

/// Fill price and lot size for rows that carry a ticker
///
/// Returns how many rows received at least one field. Lookup failures are
/// logged and leave the row untouched.
pub fn populate_rows<Q: QuoteSource + ?Sized>(source: &Q, rows: &mut [AllocationRow]) -> usize {
    let mut populated = 0;

    for row in rows.iter_mut() {
        let Some(ticker) = row.ticker.clone() else {
            continue;
        };
        let mut touched = false;

        match source.last_price(&ticker) {
            Ok(Some(price)) => {
                row.price = Some(price);
                touched = true;
            }
            Ok(None) => info!("No last price for {}", ticker),
            Err(e) => info!("Couldn't fetch last price for {}: {}", ticker, e),
        }

        match source.search(Some(&ticker)) {
            Ok(matches) => {
                let lot_size = matches
                    .iter()
                    .find(|s| s.ticker.eq_ignore_ascii_case(&ticker))
                    .and_then(|s| s.lot_size);
                if let Some(lot_size) = lot_size {
                    row.lot_size = Some(lot_size);
                    touched = true;
                }
            }
            Err(e) => info!("Couldn't look up lot size for {}: {}", ticker, e),
        }

        if touched {
            populated += 1;
        }
    }

    populated
}

/// Build a fresh row list that mirrors the index
///
/// Rows are ordered by index weight, heaviest first, and numbered from 1. Each
/// row gets the component's ticker and weight, the lot size from the
/// instrument list, and then a price lookup. Price failures are logged and
/// leave the price unset; failing to fetch the components or the instrument
/// list is an error.
pub fn rows_from_index<Q: QuoteSource + ?Sized>(
    source: &Q,
) -> Result<Vec<AllocationRow>, QuoteError> {
    let mut components = source.index_components()?;
    components.sort_by(|a, b| b.weight.cmp(&a.weight));

    let stocks = source.search(None)?;
    let mut rows: Vec<AllocationRow> = components
        .into_iter()
        .zip(1..)
        .map(|(component, id)| {
            let lot_size = stocks
                .iter()
                .find(|s| s.ticker.eq_ignore_ascii_case(&component.ticker))
                .and_then(|s| s.lot_size);
            AllocationRow {
                id,
                ticker: Some(component.ticker),
                price: None,
                weight: Some(component.weight),
                lot_size,
            }
        })
        .collect();

    for row in rows.iter_mut() {
        let Some(ticker) = row.ticker.as_deref() else {
            continue;
        };
        match source.last_price(ticker) {
            Ok(price) => row.price = price,
            Err(e) => info!("Couldn't fetch last price for {}: {}", ticker, e),
        }
    }

    info!("Copied {} index components", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quotes() -> StaticQuotes {
        StaticQuotes::new(vec![
            StockInfo {
                ticker: "SBER".into(),
                name: "Sberbank".into(),
                lot_size: Some(10),
                last_price: Some(dec!(285.4)),
            },
            StockInfo {
                ticker: "GAZP".into(),
                name: "Gazprom".into(),
                lot_size: Some(10),
                last_price: None,
            },
        ])
    }

    struct Offline;

    impl QuoteSource for Offline {
        fn last_price(&self, _ticker: &str) -> Result<Option<Decimal>, QuoteError> {
            Err(QuoteError::Unavailable("timeout".into()))
        }

        fn search(&self, _query: Option<&str>) -> Result<Vec<StockInfo>, QuoteError> {
            Err(QuoteError::Unavailable("timeout".into()))
        }

        fn index_components(&self) -> Result<Vec<IndexComponent>, QuoteError> {
            Err(QuoteError::Unavailable("timeout".into()))
        }
    }

    fn component(ticker: &str, weight: Decimal) -> IndexComponent {
        IndexComponent {
            ticker: ticker.into(),
            weight,
        }
    }

    #[test]
    fn test_search() {
        let source = quotes();
        assert_eq!(source.search(None).unwrap().len(), 2);
        assert_eq!(source.search(Some("gaz")).unwrap()[0].ticker, "GAZP");
        assert!(source.search(Some("zzz")).unwrap().is_empty());
    }

    #[test]
    fn test_populate_rows() {
        let mut rows = vec![
            AllocationRow::new(1).ticker("sber"),
            AllocationRow::new(2).ticker("GAZP"),
            AllocationRow::new(3),
        ];
        let populated = populate_rows(&quotes(), &mut rows);

        assert_eq!(populated, 2);
        assert_eq!(rows[0].price, Some(dec!(285.4)));
        assert_eq!(rows[0].lot_size, Some(10));
        // No trade: price stays unset, lot size still filled
        assert_eq!(rows[1].price, None);
        assert_eq!(rows[1].lot_size, Some(10));
        assert_eq!(rows[2], AllocationRow::new(3));
    }

    #[test]
    fn test_failures_leave_rows_untouched() {
        let mut rows = vec![AllocationRow::with_values(1, dec!(5), dec!(100), 1).ticker("SBER")];
        let before = rows.clone();
        assert_eq!(populate_rows(&Offline, &mut rows), 0);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_rows_from_index() {
        let source = quotes().with_index(vec![
            component("GAZP", dec!(12.5)),
            component("LKOH", dec!(14.1)),
            component("SBER", dec!(15.02)),
        ]);
        let rows = rows_from_index(&source).unwrap();

        let tickers: Vec<_> = rows.iter().map(|r| r.ticker.as_deref().unwrap()).collect();
        assert_eq!(tickers, vec!["SBER", "LKOH", "GAZP"]);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(rows[0].weight, Some(dec!(15.02)));
        assert_eq!(rows[0].lot_size, Some(10));
        assert_eq!(rows[0].price, Some(dec!(285.4)));
        assert!(rows[0].is_complete());

        // Not in the instrument list: weight only, price lookup fails quietly
        assert_eq!(rows[1].weight, Some(dec!(14.1)));
        assert_eq!(rows[1].lot_size, None);
        assert_eq!(rows[1].price, None);

        // Listed without a trade
        assert_eq!(rows[2].lot_size, Some(10));
        assert_eq!(rows[2].price, None);
    }

    #[test]
    fn test_rows_from_index_propagates_source_failure() {
        assert!(matches!(rows_from_index(&Offline), Err(QuoteError::Unavailable(_))));
        assert!(rows_from_index(&quotes()).unwrap().is_empty());
    }
}

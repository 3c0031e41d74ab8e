//! Supplier catalog clients.
//!
//! A catalog is an opaque lookup from SKU to a [`Part`] record. Lookups can
//! report a transient rate limit, which callers ride out with
//! [`lookup_with_retry`]; "not found" is a value, not an error.

pub mod lcsc;
pub mod mouser;

use std::time::Duration;

use anyhow::Result;

/// One quantity threshold in a part's price ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreak {
    pub quantity: u32,
    pub unit_price: f64,
}

/// Catalog data for a single purchasable part.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub mpn: String,
    pub sku: String,
    pub description: String,
    pub datasheet: String,
    /// Units in stock, if the supplier reports it.
    pub availability: Option<i64>,
    pub min_order_qty: u32,
    /// Sorted ascending by quantity.
    pub price_breaks: Vec<PriceBreak>,
}

impl Part {
    /// Unit price applicable at the requested order quantity: the largest
    /// break quantity that is <= `quantity`. No qualifying break means the
    /// price is unknown, not zero.
    pub fn price_at_qty(&self, quantity: u32) -> Option<f64> {
        self.price_breaks
            .iter()
            .filter(|pb| pb.quantity <= quantity)
            .max_by_key(|pb| pb.quantity)
            .map(|pb| pb.unit_price)
    }

    /// True when known stock covers the requested quantity.
    pub fn covers_qty(&self, quantity: u32) -> bool {
        self.availability
            .is_some_and(|stock| stock >= i64::from(quantity))
    }
}

/// Outcome of a single catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Part),
    NotFound,
    /// Transient condition; retry after a delay.
    RateLimited,
}

/// An opaque supplier catalog, queried once per BOM entry.
pub trait PartCatalog {
    fn lookup(&self, sku: &str) -> Result<Lookup>;
}

/// Delay between retries after a rate-limit response.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(2);

/// Look up a SKU, sleeping through rate-limit responses until the catalog
/// gives a definitive answer. Unbounded on purpose: a rate-limited lookup
/// must never abort the whole BOM generation. The sleep function is
/// injectable so tests never block.
pub fn lookup_with_retry(
    catalog: &dyn PartCatalog,
    sku: &str,
    sleep: &mut dyn FnMut(Duration),
) -> Result<Option<Part>> {
    loop {
        match catalog.lookup(sku)? {
            Lookup::Found(part) => return Ok(Some(part)),
            Lookup::NotFound => return Ok(None),
            Lookup::RateLimited => {
                log::warn!("Rate limited while looking up {sku}, waiting");
                sleep(RATE_LIMIT_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn part_with_breaks(breaks: &[(u32, f64)]) -> Part {
        Part {
            mpn: "MPN".to_string(),
            sku: "SKU".to_string(),
            description: String::new(),
            datasheet: String::new(),
            availability: Some(1000),
            min_order_qty: 1,
            price_breaks: breaks
                .iter()
                .map(|&(quantity, unit_price)| PriceBreak {
                    quantity,
                    unit_price,
                })
                .collect(),
        }
    }

    #[test]
    fn price_break_selects_largest_qualifying_quantity() {
        let part = part_with_breaks(&[(1, 10.0), (10, 8.0), (100, 5.0)]);
        assert_eq!(part.price_at_qty(50), Some(8.0));
        assert_eq!(part.price_at_qty(100), Some(5.0));
        assert_eq!(part.price_at_qty(1), Some(10.0));
    }

    #[test]
    fn price_unknown_when_no_break_qualifies() {
        let part = part_with_breaks(&[(10, 8.0)]);
        assert_eq!(part.price_at_qty(5), None);

        let part = part_with_breaks(&[]);
        assert_eq!(part.price_at_qty(5), None);
    }

    #[test]
    fn covers_qty_requires_known_stock() {
        let mut part = part_with_breaks(&[(1, 1.0)]);
        assert!(part.covers_qty(1000));
        assert!(!part.covers_qty(1001));
        part.availability = None;
        assert!(!part.covers_qty(1));
    }

    struct ScriptedCatalog {
        outcomes: RefCell<Vec<Lookup>>,
    }

    impl PartCatalog for ScriptedCatalog {
        fn lookup(&self, _sku: &str) -> Result<Lookup> {
            Ok(self.outcomes.borrow_mut().remove(0))
        }
    }

    #[test]
    fn retry_rides_out_rate_limits() {
        let catalog = ScriptedCatalog {
            outcomes: RefCell::new(vec![
                Lookup::RateLimited,
                Lookup::RateLimited,
                Lookup::Found(part_with_breaks(&[(1, 1.0)])),
            ]),
        };

        let mut slept = Vec::new();
        let part = lookup_with_retry(&catalog, "SKU", &mut |d| slept.push(d)).unwrap();
        assert!(part.is_some());
        assert_eq!(slept, vec![RATE_LIMIT_DELAY, RATE_LIMIT_DELAY]);
    }

    #[test]
    fn retry_returns_none_on_not_found() {
        let catalog = ScriptedCatalog {
            outcomes: RefCell::new(vec![Lookup::RateLimited, Lookup::NotFound]),
        };
        let mut sleeps = 0;
        let part = lookup_with_retry(&catalog, "SKU", &mut |_| sleeps += 1).unwrap();
        assert!(part.is_none());
        assert_eq!(sleeps, 1);
    }
}

//! LCSC catalog lookup via their search page.
//!
//! LCSC has no public part API, so this scrapes the search result page:
//! tags are stripped and the part fields recovered from the label/value
//! layout of the product table. A found page missing a mandatory field is
//! a fatal error (the page layout changed), not a per-entry issue.

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::Client;

use crate::{Lookup, Part, PartCatalog, PriceBreak};

const SEARCH_URL: &str = "https://www.lcsc.com/search";
// Without a browser User-Agent the search page serves a bot wall.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";

#[derive(Default)]
pub struct LcscClient {
    client: Client,
}

impl LcscClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartCatalog for LcscClient {
    fn lookup(&self, sku: &str) -> Result<Lookup> {
        let html = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", sku)])
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .context("LCSC request failed")?
            .text()
            .context("LCSC returned an unreadable page")?;
        parse_search_page(&html)
    }
}

/// Parse an LCSC search result page into a lookup outcome.
pub fn parse_search_page(html: &str) -> Result<Lookup> {
    // A generic "Search by keyword" title means the SKU matched nothing.
    let title = Regex::new(r"<title>([^<]*)</title>")
        .unwrap()
        .captures(html)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    if title.contains("Search by ") {
        return Ok(Lookup::NotFound);
    }

    // The datasheet link is the one field that needs the raw markup.
    let datasheet = Regex::new(r#"Datasheet[\s\S]{0,400}?href="([^"]+)""#)
        .unwrap()
        .captures(html)
        .map(|c| c[1].to_string())
        .context("Datasheet not found on LCSC page")?;

    let lines = text_lines(html);

    let availability = line_capture(&lines, r"In Stock:\s*([\d,]+)")
        .and_then(|s| s.replace(',', "").parse::<i64>().ok());

    let min_order_qty = line_capture(&lines, r"Minimum\s*:\s*(\d+)")
        .and_then(|s| s.parse().ok())
        .context("Minimum order quantity not found on LCSC page")?;

    let mpn = field_after(&lines, "Mfr. Part #").context("MPN not found on LCSC page")?;
    let sku = field_after(&lines, "LCSC Part #").context("SKU not found on LCSC page")?;
    let description =
        field_after(&lines, "Description").context("Description not found on LCSC page")?;

    Ok(Lookup::Found(Part {
        mpn,
        sku,
        description,
        datasheet,
        availability,
        min_order_qty,
        price_breaks: parse_price_breaks(&lines),
    }))
}

/// Strip markup, leaving one trimmed non-empty text line per element.
fn text_lines(html: &str) -> Vec<String> {
    Regex::new(r"<[^>]*>")
        .unwrap()
        .replace_all(html, "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn line_capture(lines: &[String], pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).unwrap();
    lines
        .iter()
        .find_map(|line| re.captures(line).map(|c| c[1].to_string()))
}

/// Value cell following a label cell: the next line after the label.
fn field_after(lines: &[String], label: &str) -> Option<String> {
    lines
        .iter()
        .position(|line| line.starts_with(label))
        .and_then(|i| lines.get(i + 1))
        .cloned()
}

/// Price ladder rows render as a quantity line ("100+") followed by a USD
/// unit price line ("US$0.0087").
fn parse_price_breaks(lines: &[String]) -> Vec<PriceBreak> {
    let qty_re = Regex::new(r"^([\d,]+)\+$").unwrap();
    let price_re = Regex::new(r"US\$\s*([\d.]+)").unwrap();

    let mut breaks = Vec::new();
    for (line, next) in lines.iter().zip(lines.iter().skip(1)) {
        let Some(qty) = qty_re.captures(line) else {
            continue;
        };
        let Some(price) = price_re.captures(next) else {
            continue;
        };
        if let (Ok(quantity), Ok(unit_price)) = (
            qty[1].replace(',', "").parse(),
            price[1].parse(),
        ) {
            breaks.push(PriceBreak {
                quantity,
                unit_price,
            });
        }
    }
    breaks.sort_by_key(|pb| pb.quantity);
    breaks
}

//! Mouser part search API client.
//!
//! Also used for TME-routed entries: catalog-style suppliers share the
//! same lookup contract, and the Mouser search endpoint is the structured
//! API we query for them.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{Lookup, Part, PartCatalog, PriceBreak};

const SEARCH_URL: &str = "https://api.mouser.com/api/v1/search/partnumber";
const RATE_LIMIT_CODE: &str = "TooManyRequests";

pub struct MouserClient {
    client: Client,
    api_key: String,
}

impl MouserClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        MouserClient {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Errors", default)]
    errors: Vec<ApiError>,
    #[serde(rename = "SearchResults")]
    search_results: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(rename = "Parts", default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(rename = "ManufacturerPartNumber", default)]
    manufacturer_part_number: Option<String>,
    #[serde(rename = "MouserPartNumber", default)]
    mouser_part_number: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "DataSheetUrl", default)]
    datasheet_url: Option<String>,
    // Mouser reports stock and minimum order as strings.
    #[serde(rename = "AvailabilityInStock", default)]
    availability_in_stock: Option<String>,
    #[serde(rename = "Min", default)]
    min: Option<String>,
    #[serde(rename = "PriceBreaks", default)]
    price_breaks: Vec<ApiPriceBreak>,
}

#[derive(Debug, Deserialize)]
struct ApiPriceBreak {
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Price")]
    price: String,
}

impl PartCatalog for MouserClient {
    fn lookup(&self, sku: &str) -> Result<Lookup> {
        let body = serde_json::json!({
            "SearchByPartRequest": { "mouserPartNumber": sku }
        });

        let response: SearchResponse = self
            .client
            .post(SEARCH_URL)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&body)
            .send()
            .context("Mouser API request failed")?
            .json()
            .context("Mouser API returned unparseable JSON")?;

        if let Some(error) = response.errors.first() {
            if error.code.as_deref() == Some(RATE_LIMIT_CODE) {
                return Ok(Lookup::RateLimited);
            }
            bail!(
                "Mouser API error: {}",
                error.message.as_deref().unwrap_or("unknown")
            );
        }

        let parts = response
            .search_results
            .map(|r| r.parts)
            .unwrap_or_default();
        match find_matching_part(parts, sku) {
            Some(part) => Ok(Lookup::Found(part_from_api(part)?)),
            None => Ok(Lookup::NotFound),
        }
    }
}

/// Search results can include related parts; only an exact SKU match
/// counts.
fn find_matching_part(parts: Vec<ApiPart>, sku: &str) -> Option<ApiPart> {
    parts
        .into_iter()
        .find(|part| part.mouser_part_number.as_deref().map(str::trim) == Some(sku.trim()))
}

fn part_from_api(part: ApiPart) -> Result<Part> {
    let mut price_breaks = part
        .price_breaks
        .into_iter()
        .map(|pb| {
            Ok(PriceBreak {
                quantity: pb.quantity,
                unit_price: parse_price(&pb.price)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    price_breaks.sort_by_key(|pb| pb.quantity);

    Ok(Part {
        mpn: part.manufacturer_part_number.unwrap_or_default(),
        sku: part.mouser_part_number.unwrap_or_default(),
        description: part.description.unwrap_or_default(),
        datasheet: part.datasheet_url.unwrap_or_default(),
        availability: part
            .availability_in_stock
            .as_deref()
            .and_then(|s| s.trim().parse().ok()),
        min_order_qty: part
            .min
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1),
        price_breaks,
    })
}

/// Mouser price strings look like `"1,23 zł"`: currency suffix after
/// whitespace, comma decimal separator.
fn parse_price(price: &str) -> Result<f64> {
    let number = price
        .split_whitespace()
        .next()
        .with_context(|| format!("empty Mouser price string: {price:?}"))?;
    number
        .replace(',', ".")
        .parse()
        .with_context(|| format!("unparseable Mouser price: {price:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_polish_price_strings() {
        assert_eq!(parse_price("1,23 zł").unwrap(), 1.23);
        assert_eq!(parse_price("10.50 zł").unwrap(), 10.5);
        assert!(parse_price("n/a").is_err());
    }

    #[test]
    fn exact_sku_match_ignores_related_parts() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "Errors": [],
                "SearchResults": {
                    "Parts": [
                        {"MouserPartNumber": "556-ATMEGA328-XU", "PriceBreaks": []},
                        {
                            "ManufacturerPartNumber": "ATMEGA328P-PU",
                            "MouserPartNumber": "556-ATMEGA328P-PU ",
                            "Description": "8-bit MCU",
                            "DataSheetUrl": "https://example.com/ds.pdf",
                            "AvailabilityInStock": "5432",
                            "Min": "1",
                            "PriceBreaks": [
                                {"Quantity": 10, "Price": "9,80 zł"},
                                {"Quantity": 1, "Price": "11,20 zł"}
                            ]
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let matched =
            find_matching_part(response.search_results.unwrap().parts, "556-ATMEGA328P-PU")
                .unwrap();
        let part = part_from_api(matched).unwrap();

        assert_eq!(part.mpn, "ATMEGA328P-PU");
        assert_eq!(part.availability, Some(5432));
        assert_eq!(part.min_order_qty, 1);
        // Breaks come back sorted ascending regardless of API order.
        assert_eq!(part.price_breaks[0].quantity, 1);
        assert_eq!(part.price_breaks[1].quantity, 10);
        assert_eq!(part.price_at_qty(5), Some(11.2));
    }

    #[test]
    fn rate_limit_error_is_detected() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"Errors": [{"Code": "TooManyRequests", "Message": "slow down"}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.errors[0].code.as_deref(),
            Some(RATE_LIMIT_CODE)
        );
    }
}

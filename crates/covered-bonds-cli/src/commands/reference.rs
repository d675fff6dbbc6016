use clap::Args;
use serde::Serialize;
use serde_json::Value;

use covered_bonds_core::reference::{IssuerCatalog, PeriodTable};

/// Arguments for the catalog listing
#[derive(Args)]
pub struct CatalogArgs {
    /// Show the window generator's issuers instead of the historical ones
    #[arg(long)]
    pub window: bool,
}

#[derive(Debug, Serialize)]
struct IssuerRow<'a> {
    country: &'a str,
    iso_code: &'a str,
    currency: &'a str,
    issuer: &'a str,
    #[serde(rename = "type")]
    instrument_type: &'a str,
    rating: &'a str,
}

pub fn run_periods() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(PeriodTable::historical())?)
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = if args.window {
        IssuerCatalog::window()
    } else {
        IssuerCatalog::historical()
    };

    // One row per issuer so table and csv output stay flat
    let rows: Vec<IssuerRow<'_>> = catalog
        .issuers()
        .map(|(country, issuer)| IssuerRow {
            country: &country.name,
            iso_code: &country.iso_code,
            currency: country.currency.code(),
            issuer: &issuer.name,
            instrument_type: &issuer.instrument_type,
            rating: &issuer.rating,
        })
        .collect();
    Ok(serde_json::to_value(rows)?)
}

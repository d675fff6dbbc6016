//! Covered bond issuers by country of domicile.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CoveredBondsError;
use crate::types::Currency;
use crate::CoveredBondsResult;

/// An issuing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub name: String,
    /// Instrument label, e.g. "Mortgage Pfandbrief".
    #[serde(rename = "type")]
    pub instrument_type: String,
    /// Two-agency rating, e.g. "Aaa/AAA".
    pub rating: String,
}

impl Issuer {
    pub fn new(name: &str, instrument_type: &str, rating: &str) -> Self {
        Self {
            name: name.to_string(),
            instrument_type: instrument_type.to_string(),
            rating: rating.to_string(),
        }
    }
}

/// A country and the issuers domiciled there.
///
/// The country fixes the issue currency: every record for an issuer listed
/// here is denominated in `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub name: String,
    /// Two-letter prefix used in generated ISINs.
    pub iso_code: String,
    pub currency: Currency,
    pub issuers: Vec<Issuer>,
}

/// Static issuer universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CountryProfile>", into = "Vec<CountryProfile>")]
pub struct IssuerCatalog {
    countries: Vec<CountryProfile>,
}

impl IssuerCatalog {
    pub fn new(countries: Vec<CountryProfile>) -> CoveredBondsResult<Self> {
        validate_countries(&countries)?;
        Ok(Self { countries })
    }

    /// Issuers behind the 2010-2023 historical corpus.
    pub fn historical() -> Self {
        use Currency::*;
        Self {
            countries: vec![
                country("Germany", "DE", EUR, &[
                    ("Deutsche Pfandbriefbank", "Mortgage Pfandbrief", "Aaa/AAA"),
                    ("Münchener Hypothekenbank", "Mortgage Pfandbrief", "Aaa/AAA"),
                    ("Berlin Hyp", "Mortgage Pfandbrief", "Aa1/AA+"),
                    ("Aareal Bank", "Mortgage Pfandbrief", "Aa3/AA-"),
                    ("DZ HYP", "Public Pfandbrief", "Aaa/AAA"),
                    ("Commerzbank", "Mortgage Pfandbrief", "Aa2/AA"),
                    ("Deutsche Bank", "Mortgage Pfandbrief", "A3/BBB+"),
                    ("Helaba", "Public Pfandbrief", "Aa1/AA+"),
                ]),
                country("France", "FR", EUR, &[
                    ("Crédit Foncier de France", "Obligations Foncières", "Aaa/AAA"),
                    ("SFIL", "Obligations Foncières", "Aaa/AAA"),
                    ("Compagnie de Financement Foncier", "Obligations Foncières", "Aaa/AAA"),
                    ("Caisse Française de Financement Local", "Obligations Foncières", "Aaa/AAA"),
                    ("Crédit Agricole", "Obligations Foncières", "Aa3/AA-"),
                    ("BNP Paribas Home Loan SFH", "Obligations Foncières", "Aa3/AA-"),
                ]),
                country("Sweden", "SE", SEK, &[
                    ("Nordea Hypotek", "Covered Bond", "Aaa/AAA"),
                    ("Swedbank Hypotek", "Covered Bond", "Aaa/AAA"),
                    ("SEB", "Covered Bond", "Aa1/AA+"),
                    ("Handelsbanken", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Denmark", "DK", DKK, &[
                    ("Danske Bank", "Covered Bond", "Aa1/AA+"),
                    ("Nykredit", "Covered Bond", "Aaa/AAA"),
                    ("Realkredit Danmark", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Norway", "NO", NOK, &[
                    ("DNB Boligkreditt", "Covered Bond", "Aaa/AAA"),
                    ("Sparebank 1 Boligkreditt", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Netherlands", "NL", EUR, &[
                    ("ABN AMRO Covered Bonds", "Covered Bond", "Aaa/AAA"),
                    ("ING Covered Bonds", "Covered Bond", "Aa3/AA-"),
                    ("Rabobank Covered Bonds", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Spain", "ES", EUR, &[
                    ("Cédulas TDA", "Cédulas Hipotecarias", "Aa2/AA"),
                    ("BBVA Cédulas", "Cédulas Hipotecarias", "A1/A+"),
                    ("Santander Cédulas", "Cédulas Territoriales", "A2/A"),
                ]),
                // Canadian programmes mostly print in euros
                country("Canada", "CA", EUR, &[
                    ("RBC Covered Bonds", "Covered Bond", "Aaa/AAA"),
                    ("TD Bank Covered Bonds", "Covered Bond", "Aaa/AAA"),
                    ("BMO Covered Bonds", "Covered Bond", "Aa1/AA+"),
                ]),
                country("UK", "GB", GBP, &[
                    ("Lloyds Covered Bonds", "Covered Bond", "A1/A+"),
                    ("Nationwide Covered Bonds", "Covered Bond", "Aa3/AA-"),
                    ("Barclays Covered Bonds", "Covered Bond", "A2/A"),
                ]),
                country("Italy", "IT", EUR, &[
                    ("UniCredit Covered Bonds", "Obbligazioni Bancarie Garantite", "Baa1/BBB+"),
                    ("Intesa Sanpaolo Covered Bonds", "Obbligazioni Bancarie Garantite", "Baa2/BBB"),
                ]),
                country("Austria", "AT", EUR, &[
                    ("Erste Bank Covered Bonds", "Covered Bond", "Aa2/AA"),
                ]),
                country("Belgium", "BE", EUR, &[
                    ("KBC Covered Bonds", "Covered Bond", "Aa3/AA-"),
                ]),
                country("Portugal", "PT", EUR, &[
                    ("Caixa Geral Covered Bonds", "Obrigações Hipotecárias", "Baa3/BBB-"),
                ]),
            ],
        }
    }

    /// Issuers behind the 2015-2026 window data set. Some carry a green
    /// instrument label of their own.
    pub fn window() -> Self {
        use Currency::*;
        Self {
            countries: vec![
                country("Germany", "DE", EUR, &[
                    ("Deutsche Pfandbriefbank", "Mortgage Pfandbrief", "Aaa/AAA"),
                    ("Münchener Hypothekenbank", "Mortgage Pfandbrief", "Aaa/AAA"),
                    ("Berlin Hyp", "Green Pfandbrief", "Aa1/AA+"),
                    ("Aareal Bank", "Mortgage Pfandbrief", "Aa3/AA-"),
                    ("Commerzbank", "Mortgage Pfandbrief", "Aa2/AA"),
                ]),
                country("France", "FR", EUR, &[
                    ("Crédit Foncier de France", "Obligations Foncières", "Aaa/AAA"),
                    ("SFIL", "Obligations Foncières", "Aaa/AAA"),
                    ("Compagnie de Financement Foncier", "Obligations Foncières", "Aaa/AAA"),
                    ("Crédit Agricole", "Green Obligations Foncières", "Aa3/AA-"),
                    ("BPCE SFH", "Obligations de Financement de l'Habitat", "Aaa/AAA"),
                ]),
                country("Spain", "ES", EUR, &[
                    ("Cédulas TDA", "Cédulas Hipotecarias", "Aa2/AA"),
                    ("BBVA", "Cédulas Hipotecarias", "A1/A+"),
                    ("Santander", "Cédulas Territoriales", "A2/A"),
                    ("CaixaBank", "Cédulas Hipotecarias", "Baa1/BBB+"),
                ]),
                country("Netherlands", "NL", EUR, &[
                    ("ABN AMRO", "Covered Bond", "Aaa/AAA"),
                    ("ING Bank", "Green Covered Bond", "Aa3/AA-"),
                    ("Rabobank", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Sweden", "SE", SEK, &[
                    ("Nordea", "Covered Bond", "Aaa/AAA"),
                    ("Swedbank", "Green Covered Bond", "Aaa/AAA"),
                ]),
                country("Denmark", "DK", DKK, &[
                    ("Danske Bank", "Covered Bond", "Aa1/AA+"),
                    ("Nykredit", "SDO", "Aaa/AAA"),
                ]),
                country("Norway", "NO", NOK, &[
                    ("DNB Boligkreditt", "Covered Bond", "Aaa/AAA"),
                ]),
                country("Canada", "CA", EUR, &[
                    ("RBC", "Covered Bond", "Aaa/AAA"),
                    ("TD Bank", "Covered Bond", "Aaa/AAA"),
                    ("BMO", "Covered Bond", "Aa1/AA+"),
                    ("CIBC", "Covered Bond", "Aaa/AAA"),
                ]),
                country("UK", "GB", GBP, &[
                    ("Lloyds Bank", "Covered Bond", "A1/A+"),
                    ("Nationwide", "Covered Bond", "Aa3/AA-"),
                    ("Barclays", "Covered Bond", "A2/A"),
                    ("HSBC UK", "Covered Bond", "Aa3/AA-"),
                ]),
                country("Italy", "IT", EUR, &[
                    ("UniCredit", "OBG", "Baa1/BBB+"),
                    ("Intesa Sanpaolo", "OBG", "Baa2/BBB"),
                ]),
                country("Austria", "AT", EUR, &[
                    ("Erste Group", "Covered Bond", "Aa2/AA"),
                ]),
                country("Belgium", "BE", EUR, &[
                    ("KBC Bank", "Covered Bond", "Aa3/AA-"),
                    ("Belfius", "Pandbrieven", "A1/A+"),
                ]),
                country("Portugal", "PT", EUR, &[
                    ("Caixa Geral", "Obrigações Hipotecárias", "Baa3/BBB-"),
                ]),
            ],
        }
    }

    /// Look up a country by name.
    pub fn country(&self, name: &str) -> CoveredBondsResult<&CountryProfile> {
        self.countries
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoveredBondsError::UnknownCountry(name.to_string()))
    }

    pub fn currency_for(&self, country: &str) -> CoveredBondsResult<Currency> {
        Ok(self.country(country)?.currency)
    }

    pub fn countries(&self) -> &[CountryProfile] {
        &self.countries
    }

    /// Every issuer paired with its country, in catalog order.
    pub fn issuers(&self) -> impl Iterator<Item = (&CountryProfile, &Issuer)> {
        self.countries
            .iter()
            .flat_map(|c| c.issuers.iter().map(move |i| (c, i)))
    }

    pub fn issuer_count(&self) -> usize {
        self.countries.iter().map(|c| c.issuers.len()).sum()
    }
}

impl Default for IssuerCatalog {
    fn default() -> Self {
        Self::historical()
    }
}

impl TryFrom<Vec<CountryProfile>> for IssuerCatalog {
    type Error = CoveredBondsError;

    fn try_from(countries: Vec<CountryProfile>) -> Result<Self, Self::Error> {
        Self::new(countries)
    }
}

impl From<IssuerCatalog> for Vec<CountryProfile> {
    fn from(catalog: IssuerCatalog) -> Self {
        catalog.countries
    }
}

fn country(name: &str, iso_code: &str, currency: Currency, issuers: &[(&str, &str, &str)]) -> CountryProfile {
    CountryProfile {
        name: name.to_string(),
        iso_code: iso_code.to_string(),
        currency,
        issuers: issuers
            .iter()
            .map(|(n, t, r)| Issuer::new(n, t, r))
            .collect(),
    }
}

fn validate_countries(countries: &[CountryProfile]) -> CoveredBondsResult<()> {
    if countries.is_empty() {
        return Err(CoveredBondsError::EmptyCatalog(
            "the issuer catalog lists no countries".into(),
        ));
    }
    let mut seen = HashSet::new();
    for c in countries {
        if !seen.insert(c.name.as_str()) {
            return Err(CoveredBondsError::InvalidInput {
                field: "catalog".into(),
                reason: format!("country {} is listed twice", c.name),
            });
        }
        if c.issuers.is_empty() {
            return Err(CoveredBondsError::EmptyCatalog(format!(
                "country {} has no issuers",
                c.name
            )));
        }
        if c.iso_code.len() != 2 || !c.iso_code.chars().all(|ch| ch.is_ascii_uppercase()) {
            return Err(CoveredBondsError::InvalidInput {
                field: format!("catalog.{}.iso_code", c.name),
                reason: format!("expected two upper-case letters, got {:?}", c.iso_code),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_are_valid() {
        assert!(validate_countries(IssuerCatalog::historical().countries()).is_ok());
        assert!(validate_countries(IssuerCatalog::window().countries()).is_ok());
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(IssuerCatalog::historical().countries().len(), 13);
        assert_eq!(IssuerCatalog::historical().issuer_count(), 40);
        assert_eq!(IssuerCatalog::window().issuer_count(), 36);
    }

    #[test]
    fn test_currency_follows_country() {
        let catalog = IssuerCatalog::historical();
        assert_eq!(catalog.currency_for("Sweden").unwrap(), Currency::SEK);
        assert_eq!(catalog.currency_for("Denmark").unwrap(), Currency::DKK);
        assert_eq!(catalog.currency_for("Norway").unwrap(), Currency::NOK);
        assert_eq!(catalog.currency_for("UK").unwrap(), Currency::GBP);
        assert_eq!(catalog.currency_for("Canada").unwrap(), Currency::EUR);
    }

    #[test]
    fn test_unknown_country_is_an_error() {
        let err = IssuerCatalog::historical().country("Atlantis").unwrap_err();
        assert!(matches!(err, CoveredBondsError::UnknownCountry(ref c) if c == "Atlantis"));
    }

    #[test]
    fn test_empty_country_rejected() {
        let mut countries: Vec<CountryProfile> = IssuerCatalog::historical().into();
        countries[0].issuers.clear();
        assert!(matches!(
            IssuerCatalog::new(countries),
            Err(CoveredBondsError::EmptyCatalog(_))
        ));
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let json = r#"[{"name": "Germany", "iso_code": "DE", "currency": "EUR",
                        "issuers": [{"name": "Test Hyp", "type": "Mortgage Pfandbrief", "rating": "Aaa/AAA"}]}]"#;
        let catalog: IssuerCatalog = serde_json::from_str(json).unwrap();
        let (country, issuer) = catalog.issuers().next().unwrap();
        assert_eq!(country.name, "Germany");
        assert_eq!(issuer.instrument_type, "Mortgage Pfandbrief");
    }
}

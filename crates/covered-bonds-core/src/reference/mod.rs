//! Static reference data: historical market eras and the issuer universe.

pub mod catalog;
pub mod periods;

pub use catalog::{CountryProfile, Issuer, IssuerCatalog};
pub use periods::{PeriodBucket, PeriodParams, PeriodTable};

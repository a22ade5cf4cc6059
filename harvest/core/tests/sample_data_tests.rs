// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use harvest_core::application::sample_data::{
    SampleAddressing, SampleDataConfig, SampleDataError, DEFAULT_ZONE_NAME,
};
use harvest_core::domain::addressing::Country;
use harvest_core::domain::repository::CountryRepository;
use harvest_core::infrastructure::repositories::{InMemoryCountryRepository, InMemoryZoneRepository};
use std::env::VarError;
use std::sync::Arc;

struct Fixture {
    countries: InMemoryCountryRepository,
    zones: InMemoryZoneRepository,
    australia: Country,
}

impl Fixture {
    async fn new() -> Self {
        let countries = InMemoryCountryRepository::new();
        let australia = Country::new("AU", "Australia")
            .with_state("Victoria", "Vic")
            .with_state("New South Wales", "NSW");
        countries.save(&australia).await.unwrap();
        countries.save(&Country::new("AQ", "Antarctica")).await.unwrap();

        Self {
            countries,
            zones: InMemoryZoneRepository::new(),
            australia,
        }
    }

    fn helpers(&self, code: &str) -> SampleAddressing {
        SampleAddressing::new(
            SampleDataConfig::new(code).unwrap(),
            Arc::new(self.countries.clone()),
            Arc::new(self.zones.clone()),
        )
    }
}

#[tokio::test]
async fn test_address_from_compact_string() {
    let fixture = Fixture::new().await;
    let address = fixture
        .helpers("AU")
        .address("12 Smith St, Springfield, 4000")
        .await
        .unwrap();

    assert_eq!(address.address1, "12 Smith St");
    assert_eq!(address.city, "Springfield");
    assert_eq!(address.zipcode, "4000");
    assert_eq!(address.country, fixture.australia);
    assert_eq!(address.state.name, "Victoria");
}

#[tokio::test]
async fn test_country_lookup_is_case_insensitive() {
    let fixture = Fixture::new().await;
    let country = fixture.helpers("au").country().await.unwrap();
    assert_eq!(country.id, fixture.australia.id);
}

#[tokio::test]
async fn test_address_errors() {
    let fixture = Fixture::new().await;

    assert!(matches!(
        fixture.helpers("AU").address("12 Smith St, Springfield").await,
        Err(SampleDataError::MalformedAddress(_))
    ));
    assert!(matches!(
        fixture.helpers("AQ").address("1 Ice Shelf, Base, 0000").await,
        Err(SampleDataError::StateNotFound(_))
    ));
    assert!(matches!(
        fixture.helpers("ZZ").address("1 Nowhere Rd, Nowhere, 0000").await,
        Err(SampleDataError::CountryNotFound(code)) if code == "ZZ"
    ));
}

#[tokio::test]
async fn test_zone_is_created_once_with_single_membership() {
    let fixture = Fixture::new().await;
    let helpers = fixture.helpers("AU");

    let first = helpers.zone().await.unwrap();
    let second = helpers.zone().await.unwrap();

    assert_eq!(first.name, DEFAULT_ZONE_NAME);
    assert_eq!(first.id, second.id);
    assert_eq!(second.members, vec![fixture.australia.id]);
    assert_eq!(fixture.zones.count().unwrap(), 1);
}

#[tokio::test]
async fn test_unset_default_country_fails_fast() {
    let err = SampleDataConfig::from_var(Err(VarError::NotPresent)).unwrap_err();
    assert!(matches!(err, SampleDataError::MissingConfiguration(_)));
    assert!(err.to_string().contains("DEFAULT_COUNTRY_CODE"));

    assert!(matches!(
        SampleDataConfig::from_var(Ok(String::new())),
        Err(SampleDataError::MissingConfiguration(_))
    ));
}

//! Property-Based Test Generators
//!
//! Provides proptest strategies and fake-data helpers for regions.

use domain_region::{Region, UserRef, REGION_NAME_MAX_LENGTH};
use fake::faker::address::en::CityName;
use fake::faker::internet::en::Username;
use fake::Fake;
use proptest::prelude::*;

/// Strategy for valid region names, NULL included
pub fn region_name_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None::<String>),
        9 => "[A-Za-z][A-Za-z ]{0,30}".prop_map(Some),
    ]
}

/// Strategy for region names that exceed the column width
pub fn overlong_region_name_strategy() -> impl Strategy<Value = String> {
    let min = REGION_NAME_MAX_LENGTH as usize + 1;
    (min..min + 64).prop_map(|len| "x".repeat(len))
}

/// Strategy for unsaved regions without a user
pub fn new_region_strategy() -> impl Strategy<Value = Region> {
    region_name_strategy().prop_map(|region_name| Region {
        region_name,
        ..Region::default()
    })
}

/// Strategy for a batch of unsaved regions
pub fn region_batch_strategy(max: usize) -> impl Strategy<Value = Vec<Region>> {
    prop::collection::vec(new_region_strategy(), 0..=max)
}

/// Strategy for page sizes
pub fn page_size_strategy() -> impl Strategy<Value = u32> {
    1u32..=25u32
}

/// A plausible region name
pub fn fake_region_name() -> String {
    CityName().fake()
}

/// A user with a random login
pub fn fake_user(id: impl Into<String>) -> UserRef {
    let login: String = Username().fake();
    UserRef::new(id).with_login(login)
}

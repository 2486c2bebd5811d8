//! Property tests for page request parsing

use core_kernel::{
    ColumnDescriptor, EntityDescriptor, ErrorKind, PageDescriptor, PageRequestParser,
    SortDirection, SortKey,
};
use proptest::prelude::*;

static REGION: EntityDescriptor = EntityDescriptor {
    name: "region",
    table: "region",
    id_column: "id",
    columns: &[ColumnDescriptor::text("regionName", "region_name")],
    relation: None,
};

const NO_SORT: &[&str] = &[];

proptest! {
    #[test]
    fn test_valid_page_and_size_round_trip(page in 0u64..1_000_000, size in 1u32..=2000) {
        let parser = PageRequestParser::default();
        let descriptor = parser
            .parse(&REGION, Some(&page.to_string()), Some(&size.to_string()), NO_SORT)
            .unwrap();

        prop_assert_eq!(descriptor.page(), page);
        prop_assert_eq!(descriptor.size(), size);
        prop_assert_eq!(descriptor.offset(), (page * u64::from(size)) as i64);
    }

    #[test]
    fn test_oversized_pages_are_clamped(size in 2001i64..i64::MAX) {
        let parser = PageRequestParser::default();
        let descriptor = parser
            .parse(&REGION, None, Some(&size.to_string()), NO_SORT)
            .unwrap();
        prop_assert_eq!(descriptor.size(), parser.max_size());
    }

    #[test]
    fn test_negative_pages_are_rejected(page in i64::MIN..0) {
        let error = PageRequestParser::default()
            .parse(&REGION, Some(&page.to_string()), None, NO_SORT)
            .unwrap_err();
        prop_assert_eq!(error.kind(), ErrorKind::InvalidPage);
    }

    #[test]
    fn test_non_positive_sizes_are_rejected(size in i64::MIN..=0) {
        let error = PageRequestParser::default()
            .parse(&REGION, None, Some(&size.to_string()), NO_SORT)
            .unwrap_err();
        prop_assert_eq!(error.kind(), ErrorKind::InvalidPageSize);
    }

    #[test]
    fn test_identity_always_breaks_ties(desc in any::<bool>(), by_name in any::<bool>()) {
        let field = if by_name { "regionName" } else { "id" };
        let direction = if desc { "desc" } else { "asc" };
        let sort = [format!("{},{}", field, direction)];
        let descriptor = PageRequestParser::default()
            .parse(&REGION, None, None, &sort)
            .unwrap();

        let orders = descriptor.effective_sort();
        let identities = orders.iter().filter(|o| o.key == SortKey::Identity).count();
        prop_assert_eq!(identities, 1);
        prop_assert_eq!(orders.len(), if by_name { 2 } else { 1 });
        prop_assert_eq!(
            orders[0].direction,
            if desc { SortDirection::Desc } else { SortDirection::Asc }
        );
    }
}

#[test]
fn test_column_name_is_accepted_as_sort_field() {
    let descriptor = PageRequestParser::default()
        .parse(&REGION, None, None, &["region_name,DESC"])
        .unwrap();
    assert_eq!(descriptor.sort()[0].key, SortKey::Column(0));
    assert_eq!(descriptor.sort()[0].direction, SortDirection::Desc);
}

#[test]
fn test_offset_overflow_is_invalid_page() {
    let error = PageDescriptor::new(u64::MAX / 2, 2000, Vec::new()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidPage);
}

#[test]
fn test_custom_parser_defaults() {
    let parser = PageRequestParser::new(5, 3);
    assert_eq!(parser.default_size(), 5);
    assert_eq!(parser.max_size(), 5);

    let descriptor = parser.parse(&REGION, None, None, NO_SORT).unwrap();
    assert_eq!(descriptor.size(), 5);
    assert_eq!(descriptor.page(), 0);
}

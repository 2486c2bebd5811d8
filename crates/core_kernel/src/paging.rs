//! Page requests and pages
//!
//! [`PageRequestParser`] turns the raw `page`, `size` and `sort` query values
//! into a canonical [`PageDescriptor`]; a [`Page`] is the bounded slice a
//! store returns for it, with totals computed at query time.

use std::fmt;

use serde::Serialize;

use crate::entity::{EntityDescriptor, SortKey};
use crate::error::{AccessError, AccessResult};

/// Page size used when the request does not carry one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a request may ask for
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` case-insensitively
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// One `(field, direction)` sort clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Canonical page request
///
/// Holds a page index, a positive page size and the sort clauses in request
/// order. Construction guarantees `page * size` fits in an `i64` offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    page: u64,
    size: u32,
    sort: Vec<SortOrder>,
}

impl PageDescriptor {
    pub fn new(page: u64, size: u32, sort: Vec<SortOrder>) -> AccessResult<Self> {
        if size == 0 {
            return Err(AccessError::invalid_page_size("page size must be greater than zero"));
        }
        page.checked_mul(u64::from(size))
            .filter(|offset| *offset <= i64::MAX as u64)
            .ok_or_else(|| {
                AccessError::invalid_page(format!(
                    "page {} with size {} exceeds the addressable range",
                    page, size
                ))
            })?;
        Ok(Self { page, size, sort })
    }

    /// First page with the given size and no sort
    pub fn first(size: u32) -> AccessResult<Self> {
        Self::new(0, size, Vec::new())
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        // Bounded by the check in `new`
        (self.page * u64::from(self.size)) as i64
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Requested sort clauses followed by identity ascending unless identity
    /// is already one of them
    pub fn effective_sort(&self) -> Vec<SortOrder> {
        let mut orders = self.sort.clone();
        if !orders.iter().any(|o| o.key == SortKey::Identity) {
            orders.push(SortOrder::new(SortKey::Identity, SortDirection::Asc));
        }
        orders
    }
}

/// Validates raw page/size/sort input against an entity descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequestParser {
    default_size: u32,
    max_size: u32,
}

impl Default for PageRequestParser {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageRequestParser {
    /// Creates a parser; the maximum never drops below the default
    pub fn new(default_size: u32, max_size: u32) -> Self {
        let default_size = default_size.max(1);
        Self {
            default_size,
            max_size: max_size.max(default_size),
        }
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Parses a page request
    ///
    /// # Errors
    ///
    /// * `InvalidPage` - page is negative, not an integer, or overflows the offset
    /// * `InvalidPageSize` - size is zero, negative or not an integer
    /// * `UnknownSortField` - a sort token names a field the entity does not have
    pub fn parse<S: AsRef<str>>(
        &self,
        entity: &EntityDescriptor,
        raw_page: Option<&str>,
        raw_size: Option<&str>,
        raw_sort: &[S],
    ) -> AccessResult<PageDescriptor> {
        let page = match raw_page.map(str::trim) {
            None | Some("") => 0,
            Some(raw) => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| AccessError::invalid_page(format!("'{}' is not an integer", raw)))?;
                if value < 0 {
                    return Err(AccessError::invalid_page(format!("page must not be negative, got {}", value)));
                }
                value as u64
            }
        };

        let size = match raw_size.map(str::trim) {
            None | Some("") => self.default_size,
            Some(raw) => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| AccessError::invalid_page_size(format!("'{}' is not an integer", raw)))?;
                if value <= 0 {
                    return Err(AccessError::invalid_page_size(format!(
                        "page size must be greater than zero, got {}",
                        value
                    )));
                }
                value.min(i64::from(self.max_size)) as u32
            }
        };

        let mut sort: Vec<SortOrder> = Vec::new();
        for token in raw_sort {
            for order in parse_sort_token(entity, token.as_ref())? {
                if !sort.iter().any(|existing| existing.key == order.key) {
                    sort.push(order);
                }
            }
        }

        PageDescriptor::new(page, size, sort)
    }
}

/// Parses `field[,field...][,direction]`
///
/// With two or more segments the last one is the direction; an unrecognised
/// direction falls back to ascending.
fn parse_sort_token(entity: &EntityDescriptor, token: &str) -> AccessResult<Vec<SortOrder>> {
    let segments: Vec<&str> = token
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let (fields, direction) = match segments.split_last() {
        None => return Ok(Vec::new()),
        Some((only, [])) => (std::slice::from_ref(only), SortDirection::Asc),
        Some((last, fields)) => (fields, SortDirection::parse(last).unwrap_or_default()),
    };

    fields
        .iter()
        .map(|field| {
            entity
                .sort_key(field)
                .map(|key| SortOrder::new(key, direction))
                .ok_or_else(|| AccessError::UnknownSortField {
                    entity: entity.name,
                    field: (*field).to_string(),
                })
        })
        .collect()
}

/// A bounded slice of a result set plus totals for the whole set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    page: u64,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, descriptor: &PageDescriptor, total_elements: u64) -> Self {
        let size = descriptor.size();
        Self {
            content,
            page: descriptor.page(),
            size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(size)),
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ColumnDescriptor;

    static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "region",
        table: "region",
        id_column: "id",
        columns: &[ColumnDescriptor::text("regionName", "region_name")],
        relation: None,
    };

    fn parse(page: Option<&str>, size: Option<&str>, sort: &[&str]) -> AccessResult<PageDescriptor> {
        PageRequestParser::default().parse(&DESCRIPTOR, page, size, sort)
    }

    #[test]
    fn test_defaults() {
        let descriptor = parse(None, None, &[]).unwrap();
        assert_eq!(descriptor.page(), 0);
        assert_eq!(descriptor.size(), DEFAULT_PAGE_SIZE);
        assert!(descriptor.sort().is_empty());
    }

    #[test]
    fn test_negative_page_rejected() {
        let err = parse(Some("-1"), None, &[]).unwrap_err();
        assert!(matches!(err, AccessError::InvalidPage(_)));
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        assert!(matches!(parse(Some("two"), None, &[]), Err(AccessError::InvalidPage(_))));
    }

    #[test]
    fn test_zero_and_negative_size_rejected() {
        assert!(matches!(parse(None, Some("0"), &[]), Err(AccessError::InvalidPageSize(_))));
        assert!(matches!(parse(None, Some("-5"), &[]), Err(AccessError::InvalidPageSize(_))));
        assert!(matches!(parse(None, Some("x"), &[]), Err(AccessError::InvalidPageSize(_))));
    }

    #[test]
    fn test_size_clamped_to_maximum() {
        let descriptor = parse(None, Some("100000"), &[]).unwrap();
        assert_eq!(descriptor.size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_overflow_rejected() {
        let huge = i64::MAX.to_string();
        let err = parse(Some(&huge), Some("20"), &[]).unwrap_err();
        assert!(matches!(err, AccessError::InvalidPage(_)));
    }

    #[test]
    fn test_sort_with_direction() {
        let descriptor = parse(None, None, &["id,desc"]).unwrap();
        assert_eq!(
            descriptor.sort(),
            &[SortOrder::new(SortKey::Identity, SortDirection::Desc)]
        );
    }

    #[test]
    fn test_sort_direction_defaults_to_ascending() {
        let descriptor = parse(None, None, &["regionName", "id,sideways"]).unwrap();
        assert_eq!(
            descriptor.sort(),
            &[
                SortOrder::new(SortKey::Column(0), SortDirection::Asc),
                SortOrder::new(SortKey::Identity, SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_sort_direction_is_case_insensitive() {
        let descriptor = parse(None, None, &["regionName,DESC"]).unwrap();
        assert_eq!(descriptor.sort()[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let err = parse(None, None, &["colour,asc"]).unwrap_err();
        match err {
            AccessError::UnknownSortField { entity, field } => {
                assert_eq!(entity, "region");
                assert_eq!(field, "colour");
            }
            other => panic!("Expected UnknownSortField, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_field_token_shares_direction() {
        let descriptor = parse(None, None, &["regionName,id,desc"]).unwrap();
        assert_eq!(
            descriptor.sort(),
            &[
                SortOrder::new(SortKey::Column(0), SortDirection::Desc),
                SortOrder::new(SortKey::Identity, SortDirection::Desc),
            ]
        );
    }

    #[test]
    fn test_repeated_field_keeps_first() {
        let descriptor = parse(None, None, &["id,desc", "id,asc", ""]).unwrap();
        assert_eq!(descriptor.sort().len(), 1);
        assert_eq!(descriptor.sort()[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_effective_sort_appends_identity() {
        let descriptor = parse(None, None, &["regionName,desc"]).unwrap();
        let effective = descriptor.effective_sort();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[1], SortOrder::new(SortKey::Identity, SortDirection::Asc));

        let by_id = parse(None, None, &["id,desc"]).unwrap();
        assert_eq!(by_id.effective_sort().len(), 1);
    }

    #[test]
    fn test_page_totals() {
        let descriptor = PageDescriptor::new(1, 20, Vec::new()).unwrap();
        let page = Page::new(vec![1, 2, 3], &descriptor, 23);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.total_elements(), 23);
        assert!(page.is_last());

        let empty = Page::<i32>::new(Vec::new(), &descriptor, 0);
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_offset_and_limit() {
        let descriptor = PageDescriptor::new(3, 25, Vec::new()).unwrap();
        assert_eq!(descriptor.offset(), 75);
        assert_eq!(descriptor.limit(), 25);
    }
}

//! Rendering of operation outcomes
//!
//! Mutations carry an alert as two headers, `X-<app>-alert` with the alert
//! key and `X-<app>-params` with the entity id. Listings carry their totals
//! in `X-Total-Count`, `X-Total-Pages`, `X-Page-Number` and `X-Page-Size`
//! plus an RFC 5988 `Link` header.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::{OperationAlert, Outcome, PaginationMetadata};
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";
pub const PAGE_NUMBER_HEADER: &str = "x-page-number";
pub const PAGE_SIZE_HEADER: &str = "x-page-size";

/// What the renderer needs to know about the request
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    /// Prefix of alert headers and keys
    pub app_name: &'a str,
    pub entity_name: &'a str,
    /// Collection path the entity is served under, e.g. `/api/regions`
    pub collection_path: &'a str,
    /// Sort parameters to repeat in `Link` targets
    pub sort: &'a [String],
}

/// Turns an outcome into an HTTP response
pub fn render<E: Serialize>(outcome: Outcome<E>, context: &ResponseContext<'_>) -> Response {
    match outcome {
        Outcome::Created { entity, alert } => {
            let mut headers = alert_headers(&alert, context.app_name);
            let location = format!("{}/{}", context.collection_path, alert.id);
            if let Ok(value) = HeaderValue::try_from(location) {
                headers.insert(header::LOCATION, value);
            }
            (StatusCode::CREATED, headers, Json(entity)).into_response()
        }
        Outcome::Updated { entity, alert } => {
            (StatusCode::OK, alert_headers(&alert, context.app_name), Json(entity)).into_response()
        }
        Outcome::Deleted { alert } => (StatusCode::OK, alert_headers(&alert, context.app_name)).into_response(),
        Outcome::Found(entity) => (StatusCode::OK, Json(entity)).into_response(),
        Outcome::Listed { content, pagination } => {
            let headers = pagination_headers(&pagination, context.collection_path, context.sort);
            (StatusCode::OK, headers, Json(content)).into_response()
        }
        Outcome::Absent => ApiError::NotFound(format!("{} not found", context.entity_name)).into_response(),
        Outcome::Failed(failure) => ApiError::from(failure).into_response(),
    }
}

/// `X-<app>-alert` and `X-<app>-params` for a mutation
pub fn alert_headers(alert: &OperationAlert, app_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let names = (
        HeaderName::try_from(format!("x-{}-alert", app_name)),
        HeaderName::try_from(format!("x-{}-params", app_name)),
    );
    match names {
        (Ok(alert_name), Ok(params_name)) => {
            if let Ok(value) = HeaderValue::try_from(alert.key(app_name)) {
                headers.insert(alert_name, value);
            }
            headers.insert(params_name, HeaderValue::from(alert.id.value()));
        }
        _ => warn!(app_name, "Application name is not a valid header token; alert dropped"),
    }
    headers
}

/// Totals headers and the `Link` header for a listing
pub fn pagination_headers(pagination: &PaginationMetadata, collection_path: &str, sort: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(pagination.total_elements));
    headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from(pagination.total_pages));
    headers.insert(PAGE_NUMBER_HEADER, HeaderValue::from(pagination.page));
    headers.insert(PAGE_SIZE_HEADER, HeaderValue::from(pagination.size));
    if let Ok(value) = HeaderValue::try_from(link_header(pagination, collection_path, sort)) {
        headers.insert(header::LINK, value);
    }
    headers
}

/// `next`, `prev`, `last` and `first` links, the first two only when such a
/// page exists
pub fn link_header(pagination: &PaginationMetadata, collection_path: &str, sort: &[String]) -> String {
    let sort_query: String = sort
        .iter()
        .map(|s| format!("&sort={}", encode_query_value(s)))
        .collect();
    let link = |page: u64, rel: &str| {
        format!(
            "<{}?page={}&size={}{}>; rel=\"{}\"",
            collection_path, page, pagination.size, sort_query, rel
        )
    };

    let last_page = pagination.total_pages.saturating_sub(1);
    let mut links = Vec::with_capacity(4);
    if pagination.page < last_page {
        links.push(link(pagination.page + 1, "next"));
    }
    if pagination.page > 0 {
        links.push(link(pagination.page - 1, "prev"));
    }
    links.push(link(last_page, "last"));
    links.push(link(0, "first"));
    links.join(",")
}

fn encode_query_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b',' | b'_' | b'-' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AlertAction, EntityId};

    fn pagination(page: u64, total_elements: u64) -> PaginationMetadata {
        PaginationMetadata {
            page,
            size: 2,
            total_elements,
            total_pages: total_elements.div_ceil(2),
        }
    }

    #[test]
    fn test_alert_headers() {
        let alert = OperationAlert::new("region", EntityId::new(7), AlertAction::Created);
        let headers = alert_headers(&alert, "regionApp");
        assert_eq!(headers["x-regionapp-alert"], "regionApp.region.created");
        assert_eq!(headers["x-regionapp-params"], "7");
    }

    #[test]
    fn test_link_header_middle_page() {
        let sort = vec!["id,desc".to_string()];
        let link = link_header(&pagination(1, 6), "/api/regions", &sort);
        assert_eq!(
            link,
            "</api/regions?page=2&size=2&sort=id,desc>; rel=\"next\",\
             </api/regions?page=0&size=2&sort=id,desc>; rel=\"prev\",\
             </api/regions?page=2&size=2&sort=id,desc>; rel=\"last\",\
             </api/regions?page=0&size=2&sort=id,desc>; rel=\"first\""
        );
    }

    #[test]
    fn test_link_header_empty_result() {
        let link = link_header(&pagination(0, 0), "/api/regions", &[]);
        assert_eq!(
            link,
            "</api/regions?page=0&size=2>; rel=\"last\",</api/regions?page=0&size=2>; rel=\"first\""
        );
    }

    #[test]
    fn test_sort_values_are_encoded() {
        assert_eq!(encode_query_value("regionName, desc"), "regionName,%20desc");
    }

    #[test]
    fn test_pagination_headers() {
        let headers = pagination_headers(&pagination(0, 3), "/api/regions", &[]);
        assert_eq!(headers[TOTAL_COUNT_HEADER], "3");
        assert_eq!(headers[TOTAL_PAGES_HEADER], "2");
        assert_eq!(headers[PAGE_NUMBER_HEADER], "0");
        assert_eq!(headers[PAGE_SIZE_HEADER], "2");
        assert!(headers.contains_key(header::LINK));
    }
}

//! Query parameter contract shared by every list-producing operation.
//!
//! Raw parameters arrive as `*Params` structs (straight from the query string
//! or request body). [`validator`] checks each constraint; the first violated
//! constraint, in declared field order, is reported as a
//! [`CoreError::Validation`]. A successful validation yields a fully
//! defaulted query record.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest accepted `limit`.
pub const MAX_LIMIT: i64 = 100;

/// Accepted `order` values for hospital listings.
pub const ORDER_AVAILABLE_PLACES_DESC: &str = "availablePlaces.desc";
pub const ORDER_HOSPITAL_NAME_ASC: &str = "hospitalName.asc";

/// Letters of any alphabet (with combining marks), ASCII digits, space, hyphen.
static SEARCH_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}0-9 \-]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of results plus the total before pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Slice an already filtered and sorted list.
///
/// An offset past the end yields no items; `total` is always the full length.
pub fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);

    let items = items.into_iter().skip(offset).take(limit).collect();
    Page { items, total }
}

// ---------------------------------------------------------------------------
// Raw parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /wards`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WardListParams {
    #[validate(
        length(min = 1, max = 100, message = "search must be 1-100 characters long"),
        custom(function = "validate_search_charset")
    )]
    pub search: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Query parameters for `GET /wards/{ward_name}/hospitals`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HospitalListParams {
    #[validate(
        length(min = 1, max = 100, message = "district must be 1-100 characters long"),
        custom(function = "validate_search_charset")
    )]
    pub district: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "search must be 1-100 characters long"),
        custom(function = "validate_search_charset")
    )]
    pub search: Option<String>,
    #[validate(custom(function = "validate_hospital_order"))]
    pub order: Option<String>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Body of `POST /users/me/favorites`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddFavoriteRequest {
    #[validate(
        length(min = 1, max = 200, message = "ward_name must be 1-200 characters long"),
        custom(function = "validate_ward_name")
    )]
    pub ward_name: String,
}

// ---------------------------------------------------------------------------
// Validated query records
// ---------------------------------------------------------------------------

/// Validated `GET /wards` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WardQuery {
    pub search: Option<String>,
    pub favorites_only: bool,
    pub page: PageRequest,
}

/// Sort order for hospital listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HospitalOrder {
    /// Numeric parsed availability, highest first. Ties by hospital name.
    #[default]
    AvailablePlacesDesc,
    HospitalNameAsc,
}

impl HospitalOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ORDER_AVAILABLE_PLACES_DESC => Some(Self::AvailablePlacesDesc),
            ORDER_HOSPITAL_NAME_ASC => Some(Self::HospitalNameAsc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AvailablePlacesDesc => ORDER_AVAILABLE_PLACES_DESC,
            Self::HospitalNameAsc => ORDER_HOSPITAL_NAME_ASC,
        }
    }
}

/// Validated `GET /wards/{ward_name}/hospitals` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalQuery {
    pub district: Option<String>,
    pub search: Option<String>,
    pub order: HospitalOrder,
    pub page: PageRequest,
}

impl WardListParams {
    pub fn into_query(self) -> Result<WardQuery, CoreError> {
        self.validate()
            .map_err(|e| first_violation(&e, &["search", "limit", "offset"]))?;

        Ok(WardQuery {
            search: self.search,
            favorites_only: self.favorites_only,
            page: page_request(self.limit, self.offset),
        })
    }
}

impl HospitalListParams {
    pub fn into_query(self) -> Result<HospitalQuery, CoreError> {
        self.validate().map_err(|e| {
            first_violation(&e, &["district", "search", "order", "limit", "offset"])
        })?;

        let order = match self.order.as_deref() {
            Some(value) => HospitalOrder::parse(value)
                .ok_or_else(|| CoreError::validation("order", order_message()))?,
            None => HospitalOrder::default(),
        };

        Ok(HospitalQuery {
            district: self.district,
            search: self.search,
            order,
            page: page_request(self.limit, self.offset),
        })
    }
}

impl PaginationParams {
    pub fn into_page(self) -> Result<PageRequest, CoreError> {
        self.validate()
            .map_err(|e| first_violation(&e, &["limit", "offset"]))?;
        Ok(page_request(self.limit, self.offset))
    }
}

impl AddFavoriteRequest {
    /// Validate and return the trimmed ward name.
    pub fn into_ward_name(self) -> Result<String, CoreError> {
        let trimmed = Self {
            ward_name: self.ward_name.trim().to_string(),
        };
        trimmed
            .validate()
            .map_err(|e| first_violation(&e, &["ward_name"]))?;
        Ok(trimmed.ward_name)
    }
}

fn page_request(limit: Option<i64>, offset: Option<i64>) -> PageRequest {
    PageRequest {
        limit: limit.unwrap_or(DEFAULT_LIMIT),
        offset: offset.unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
// Custom validators
// ---------------------------------------------------------------------------

fn validate_search_charset(value: &str) -> Result<(), ValidationError> {
    if SEARCH_CHARSET_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("charset");
        err.message = Some("only letters, digits, spaces and hyphens are allowed".into());
        Err(err)
    }
}

fn validate_hospital_order(value: &str) -> Result<(), ValidationError> {
    if HospitalOrder::parse(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("order");
        err.message = Some(order_message().into());
        Err(err)
    }
}

fn validate_ward_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        let mut err = ValidationError::new("control_characters");
        err.message = Some("ward_name must not contain control characters".into());
        Err(err)
    } else {
        Ok(())
    }
}

fn order_message() -> String {
    format!("order must be one of: {ORDER_AVAILABLE_PLACES_DESC}, {ORDER_HOSPITAL_NAME_ASC}")
}

/// Pick the first violated constraint, walking fields in `field_order`.
fn first_violation(errors: &ValidationErrors, field_order: &[&'static str]) -> CoreError {
    let field_errors = errors.field_errors();

    for &field in field_order {
        if let Some(error) = field_errors.get(field).and_then(|errs| errs.first()) {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
            return CoreError::validation(field, message);
        }
    }

    CoreError::validation("query", errors.to_string())
}

//! Windowing rules for list requests.
//!
//! `from` and `size` travel together: both absent means the default window,
//! one without the other is rejected.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{UserError, UserResult};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `?from=&size=` query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Offset of the first record (must be sent together with `size`)
    #[param(minimum = 0, example = 0)]
    pub from: Option<i64>,
    /// Page length, 1 to 100 (must be sent together with `from`)
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub size: Option<i64>,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> Self {
        Self {
            from: Some(from),
            size: Some(size),
        }
    }
}

/// A validated `(from, size)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: i64,
    pub size: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Window {
    /// Checks sign, zero size and the upper bound, in that order.
    pub fn new(from: i64, size: i64) -> UserResult<Self> {
        if from < 0 {
            return Err(UserError::InvalidPagingParameter(format!(
                "from must not be negative, got {from}"
            )));
        }
        if size <= 0 {
            return Err(UserError::InvalidPagingParameter(format!(
                "size must be positive, got {size}"
            )));
        }
        if size > MAX_PAGE_SIZE {
            return Err(UserError::PageSizeTooLarge);
        }
        Ok(Self { from, size })
    }

    pub fn offset(&self) -> u64 {
        self.from.unsigned_abs()
    }

    pub fn limit(&self) -> u64 {
        self.size.unsigned_abs()
    }
}

/// Resolve query parameters into a window.
pub fn normalize(request: PageRequest) -> UserResult<Window> {
    match (request.from, request.size) {
        (None, None) => Ok(Window::default()),
        (Some(from), Some(size)) => Window::new(from, size),
        _ => Err(UserError::MissingPagingParameter),
    }
}

/// One page of results with the effective window echoed back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub result: Vec<T>,
    pub total_count: u64,
    pub from: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(result: Vec<T>, total_count: u64, window: Window) -> Self {
        Self {
            result,
            total_count,
            from: window.from,
            size: window.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_both_absent() {
        let window = normalize(PageRequest::default()).unwrap();
        assert_eq!(window, Window { from: 0, size: 10 });
    }

    #[test]
    fn test_one_parameter_alone_is_rejected() {
        for request in [
            PageRequest { from: Some(0), size: None },
            PageRequest { from: None, size: Some(5) },
        ] {
            assert!(matches!(
                normalize(request),
                Err(UserError::MissingPagingParameter)
            ));
        }
    }

    #[test]
    fn test_size_bounds() {
        assert_eq!(normalize(PageRequest::new(0, 100)).unwrap().size, 100);
        assert_eq!(normalize(PageRequest::new(3, 1)).unwrap().from, 3);
        assert!(matches!(
            normalize(PageRequest::new(0, 101)),
            Err(UserError::PageSizeTooLarge)
        ));
        assert!(matches!(
            normalize(PageRequest::new(0, 0)),
            Err(UserError::InvalidPagingParameter(_))
        ));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        assert!(matches!(
            normalize(PageRequest::new(-1, 10)),
            Err(UserError::InvalidPagingParameter(_))
        ));
        assert!(matches!(
            normalize(PageRequest::new(0, -5)),
            Err(UserError::InvalidPagingParameter(_))
        ));
    }

    #[test]
    fn test_sign_checked_before_upper_bound() {
        assert!(matches!(
            normalize(PageRequest::new(-1, 500)),
            Err(UserError::InvalidPagingParameter(_))
        ));
    }

    #[test]
    fn test_page_serializes_total_count() {
        let page = Page::new(vec![1, 2, 3], 3, Window::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["from"], 0);
        assert_eq!(json["size"], 10);
    }
}

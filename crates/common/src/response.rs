//! Standard response envelopes
//!
//! Every endpoint answers with `{success, data?, message?, error?}`; list
//! endpoints wrap their rows in `{data, pagination}` inside the envelope.

use serde::Serialize;

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// A page of repository results: the rows plus the unclamped match count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
}

/// Pagination block of the list envelope
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            // ceil(total / limit) without floating point
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// Paginated list body: rows plus page metadata
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(page: Page<T>, page_number: i64, limit: i64) -> Self {
        Self {
            pagination: PageMeta::new(page_number, limit, page.total),
            data: page.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PageMeta::new(1, 10, 25).total_pages, 3);
        assert_eq!(PageMeta::new(1, 10, 30).total_pages, 3);
        assert_eq!(PageMeta::new(1, 10, 31).total_pages, 4);
        assert_eq!(PageMeta::new(1, 20, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 20, 1).total_pages, 1);
    }

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 42);
        assert!(body.get("message").is_none());
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let page = Page {
            data: vec!["a", "b"],
            total: 25,
        };
        let body = serde_json::to_value(Paginated::new(page, 2, 10)).unwrap();
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["total"], 25);
        assert_eq!(body["pagination"]["totalPages"], 3);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }
}

//! DTOs comunes de la API
//!
//! Envelope estándar `{ message, data }` y estructuras de paginación.

use serde::{Deserialize, Serialize};

/// Response genérica de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            message,
            data: Some(data),
        }
    }
}

/// Parámetros de paginación de querystring
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

impl PaginationParams {
    /// Normaliza page/per_page a valores seguros
    pub fn normalize(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }

    pub fn offset(&self) -> i64 {
        let (page, per_page) = self.normalize();
        (page - 1) * per_page
    }
}

/// Response de listados paginados
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normalize_defaults() {
        let params = PaginationParams {
            page: None,
            per_page: None,
        };
        assert_eq!(params.normalize(), (1, DEFAULT_PER_PAGE));
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_normalize_caps_per_page() {
        let params = PaginationParams {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(params.normalize(), (3, MAX_PER_PAGE));
        assert_eq!(params.offset(), 200);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let resp = PaginatedResponse::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(resp.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}

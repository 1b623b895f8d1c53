//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - `GET /health`: Liveness, never touches the store
//! - `GET /api/test-db`: Store connectivity check
//! - `GET /api/users`: All user records, ordered by ID
//!
//! Every endpoint is read-only and answers with JSON. None of them read a request body
//! or query parameters.
//!
//! # OpenAPI Documentation
//!
//! Endpoints are annotated with `utoipa`; the generated document is served at
//! `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;

//! Members Domain
//!
//! Lifecycle and authentication for interview-panel member accounts:
//! onboarding, partial updates, soft deactivation, paginated listing and
//! credential login with bearer-token issuance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (thin)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business rules, validation, auth flow
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, enums, pagination
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{jwt::JwtConfig, members::MemberSettings};
//! use domain_members::{
//!     auth::JwtTokenIssuer, handlers, repository::InMemoryMemberRepository,
//!     service::MemberService,
//! };
//!
//! let repository = InMemoryMemberRepository::new();
//! let issuer = JwtTokenIssuer::new(JwtConfig::new("a-signing-secret-of-at-least-32-chars"));
//! let service = MemberService::new(repository, issuer, MemberSettings::default());
//!
//! let router = handlers::router(service);
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

mod validation;

// Re-export commonly used types
pub use auth::{Argon2PasswordService, JwtTokenIssuer, PasswordService, TokenIssuer};
pub use error::{AuthFailure, MemberError, MemberResult};
pub use models::{
    CreateMember, LoginRequest, LoginResponse, Member, MemberFilter, MemberResponse,
    PaginatedResult, Role, SortField, SortOrder, Source, UpdateMember,
};
pub use repository::{InMemoryMemberRepository, MemberRepository};
pub use service::MemberService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Member role - exactly one per member
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    MasterAdmin,
    PracticeAdmin,
    TechTeamMember,
    TaTeamAdmin,
}

/// Source system making the change, kept for audit trails
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Source {
    Web,
    Mobile,
    Api,
    Thirdparty,
    Manual,
}

/// Member entity - the aggregate root for interview-panel users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Member {
    /// Unique identifier
    pub id: Uuid,
    /// Login name, unique and immutable after creation
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Email address (unique, restricted to the approved domain)
    pub email: String,
    /// Optional contact number (unique when present)
    pub phone_number: Option<String>,
    pub role: Role,
    /// Practice the member belongs to
    pub practice_id: Option<Uuid>,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Soft-delete flag; deactivated members never come back
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_by: String,
    pub source: Source,
    /// Set only on successful authentication
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Safe projection of a member (without password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub practice_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: String,
    pub source: Source,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            user_name: member.user_name,
            first_name: member.first_name,
            last_name: member.last_name,
            email: member.email,
            phone_number: member.phone_number,
            role: member.role,
            practice_id: member.practice_id,
            is_active: member.is_active,
            created_at: member.created_at,
            updated_at: member.updated_at,
            modified_by: member.modified_by,
            source: member.source,
            last_login_at: member.last_login_at,
        }
    }
}

/// DTO for onboarding a new member
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMember {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub practice_id: Uuid,
    pub source: Source,
    pub created_by: String,
    /// Initial password; one is generated when omitted
    pub password: Option<String>,
}

/// DTO for partially updating a member.
///
/// Absent fields are left untouched; the login name is immutable and
/// therefore not part of this DTO.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMember {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
    pub practice_id: Option<Uuid>,
    pub source: Source,
    pub modified_by: String,
}

/// DTO for member login
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// Response after successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub member: MemberResponse,
}

/// Sortable columns for member listings.
///
/// Anything outside this allow-list silently falls back to the default so
/// caller-supplied sort strings never reach storage verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, ToSchema)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    UserName,
    FirstName,
    LastName,
    Email,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

/// Sort direction, defaulting to newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, ToSchema)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

/// Raw query filters for listing members, as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct MemberFilter {
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
    pub practice_id: Option<Uuid>,
}

fn default_page_number() -> u32 {
    1
}

/// Normalized listing query handed to the repository: bounds applied,
/// sort restricted to the allow-list
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPageQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
    pub practice_id: Option<Uuid>,
}

impl MemberPageQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

/// A single page of results with the total match count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> PaginatedResult<T> {
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size)) as u32
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }
}

impl Member {
    /// Build a new active member from the create DTO (password already hashed)
    pub fn new(input: CreateMember, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_name: input.user_name,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            role: input.role,
            practice_id: Some(input.practice_id),
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: input.created_by.clone(),
            modified_by: input.created_by,
            source: input.source,
            last_login_at: None,
        }
    }

    /// Apply a partial update: only supplied fields are overwritten, the
    /// audit trio (updated_at, modified_by, source) is always stamped
    pub fn apply_update(&mut self, update: UpdateMember) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(practice_id) = update.practice_id {
            self.practice_id = Some(practice_id);
        }
        self.source = update.source;
        self.modified_by = update.modified_by;
        self.updated_at = Utc::now();
    }
}

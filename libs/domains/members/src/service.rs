use chrono::Utc;
use core_config::members::MemberSettings;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Argon2PasswordService, PasswordService, TokenIssuer, generate_password};
use crate::error::{AuthFailure, MemberError, MemberResult};
use crate::models::{
    CreateMember, LoginRequest, LoginResponse, Member, MemberFilter, MemberPageQuery,
    MemberResponse, PaginatedResult, SortField, SortOrder, Source, UpdateMember,
};
use crate::repository::MemberRepository;
use crate::validation;

/// Service layer for member lifecycle, authentication and listing.
///
/// Stateless per invocation; safe to share across concurrent requests. The
/// only suspension points are the awaited repository calls.
pub struct MemberService<R: MemberRepository> {
    repository: Arc<R>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenIssuer>,
    settings: MemberSettings,
}

impl<R: MemberRepository> Clone for MemberService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            passwords: Arc::clone(&self.passwords),
            tokens: Arc::clone(&self.tokens),
            settings: self.settings.clone(),
        }
    }
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repository: R, tokens: impl TokenIssuer + 'static, settings: MemberSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            passwords: Arc::new(Argon2PasswordService),
            tokens: Arc::new(tokens),
            settings,
        }
    }

    /// Swap the credential primitive (used by tests)
    pub fn with_password_service(mut self, passwords: impl PasswordService + 'static) -> Self {
        self.passwords = Arc::new(passwords);
        self
    }

    /// Onboard a new member.
    ///
    /// Validation collects every violation before failing; no insert is
    /// attempted unless the input is fully valid. A password is generated
    /// when the caller does not supply one.
    pub async fn create_member(&self, input: CreateMember) -> MemberResult<MemberResponse> {
        if let Err(e) = validation::validate_create(
            self.repository.as_ref(),
            &self.settings,
            &input,
        )
        .await
        {
            if let MemberError::Validation(ref message) = e {
                tracing::warn!("Validation failed for member create: {}", message);
            }
            return Err(e);
        }

        let password = input
            .password
            .clone()
            .unwrap_or_else(|| generate_password(self.settings.generated_password_len));
        let password_hash = self.passwords.hash(&password)?;

        let member = Member::new(input, password_hash);

        let created = match self.repository.add(member).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create member");
                return Err(e);
            }
        };

        tracing::info!(member_id = %created.id, "Member created");
        Ok(created.into())
    }

    /// Get a member by ID
    pub async fn get_member(&self, id: Uuid) -> MemberResult<MemberResponse> {
        let member = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(MemberError::NotFound)?;

        Ok(member.into())
    }

    /// Partially update a member: absent fields stay untouched, the login
    /// name is never altered, and duplicate checks only run for values that
    /// actually change.
    pub async fn update_member(
        &self,
        id: Uuid,
        input: UpdateMember,
    ) -> MemberResult<MemberResponse> {
        validation::validate_update(&self.settings, &input)?;

        let mut member = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(MemberError::NotFound)?;

        if let Some(new_email) = input.email.as_deref() {
            if !new_email.eq_ignore_ascii_case(&member.email)
                && self.repository.email_exists(new_email).await?
            {
                tracing::warn!(member_id = %id, "Email already exists");
                return Err(MemberError::Conflict(
                    validation::DUPLICATE_EMAIL.to_string(),
                ));
            }
        }

        if let Some(new_phone) = input.phone_number.as_deref() {
            let changed = member
                .phone_number
                .as_deref()
                .is_none_or(|current| !current.eq_ignore_ascii_case(new_phone));
            if changed && self.repository.phone_exists(new_phone).await? {
                tracing::warn!(member_id = %id, "Phone number already exists");
                return Err(MemberError::Conflict(
                    validation::DUPLICATE_PHONE.to_string(),
                ));
            }
        }

        member.apply_update(input);

        let updated = self.repository.update(member).await?;

        tracing::info!(member_id = %updated.id, "Member updated");
        Ok(updated.into())
    }

    /// Deactivate a member. The repository applies a single conditional
    /// update; a missing or already-inactive member reports the same
    /// failure both times. Returns the id as confirmation.
    pub async fn deactivate_member(
        &self,
        id: Uuid,
        actor: &str,
        source: Source,
    ) -> MemberResult<Uuid> {
        let confirmed = self.repository.deactivate(id, actor, source).await?;
        tracing::info!(member_id = %confirmed, "Member deactivated");
        Ok(confirmed)
    }

    /// Authenticate by username or email and issue a bearer token.
    ///
    /// The check order is deliberate: structural validation, then lookup,
    /// then credential verification, then the activity check. No failure
    /// path has side effects.
    pub async fn login(&self, input: LoginRequest) -> MemberResult<LoginResponse> {
        if input.username_or_email.trim().is_empty() {
            return Err(MemberError::Validation(
                "Username or email is required.".to_string(),
            ));
        }
        if input.password.trim().is_empty() {
            return Err(MemberError::Validation("Password is required.".to_string()));
        }

        let mut member = self
            .repository
            .get_by_username_or_email(&input.username_or_email)
            .await?
            .ok_or(MemberError::Authentication(AuthFailure::UnknownIdentifier))?;

        if !self.passwords.verify(&input.password, &member.password_hash)? {
            return Err(MemberError::Authentication(AuthFailure::InvalidCredentials));
        }

        if !member.is_active {
            return Err(MemberError::Authentication(AuthFailure::InactiveAccount));
        }

        // Best effort: a failed timestamp write must not fail the login
        let now = Utc::now();
        match self.repository.update_last_login(member.id, now).await {
            Ok(()) => member.last_login_at = Some(now),
            Err(e) => {
                tracing::warn!(member_id = %member.id, error = %e, "Failed to record last login")
            }
        }

        let token = self.tokens.issue(&member)?;

        tracing::info!(member_id = %member.id, "Member logged in");
        Ok(LoginResponse {
            token,
            member: member.into(),
        })
    }

    /// List members with filters, sorting and pagination pushed to storage.
    /// A repository failure propagates as an error rather than masquerading
    /// as an empty page.
    pub async fn list_members(
        &self,
        filter: MemberFilter,
    ) -> MemberResult<PaginatedResult<MemberResponse>> {
        let query = self.normalize(filter);
        let page_number = query.page_number;
        let page_size = query.page_size;

        let (members, total_count) = match self.repository.get_paged(query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list members");
                return Err(e);
            }
        };

        Ok(PaginatedResult {
            items: members.into_iter().map(MemberResponse::from).collect(),
            total_count,
            page_number,
            page_size,
        })
    }

    fn normalize(&self, filter: MemberFilter) -> MemberPageQuery {
        MemberPageQuery {
            page_number: filter.page_number.max(1),
            page_size: filter
                .page_size
                .unwrap_or(self.settings.default_page_size)
                .clamp(1, self.settings.max_page_size),
            sort_by: SortField::parse_or_default(filter.sort_by.as_deref()),
            sort_order: SortOrder::parse_or_default(filter.sort_order.as_deref()),
            is_active: filter.is_active,
            role: filter.role,
            practice_id: filter.practice_id,
        }
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{MemberError, MemberResult};
use crate::models::{Member, MemberPageQuery, SortField, SortOrder, Source};
use crate::validation::{DUPLICATE_EMAIL, DUPLICATE_PHONE, DUPLICATE_USER_NAME};

/// Repository trait for Member persistence.
///
/// Implementations must enforce hard uniqueness constraints on username,
/// email and phone number: the service layer pre-checks for a friendly
/// error, but the pre-check is check-then-act and the storage constraint is
/// the backstop under concurrency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member; duplicate username/email/phone is a `Conflict`
    async fn add(&self, member: Member) -> MemberResult<Member>;

    /// Get a member by ID
    async fn get_by_id(&self, id: Uuid) -> MemberResult<Option<Member>>;

    /// Find a member whose username or email matches, case-insensitively
    async fn get_by_username_or_email(&self, identifier: &str) -> MemberResult<Option<Member>>;

    /// Overwrite an existing member; no matching row is `NotFound`
    async fn update(&self, member: Member) -> MemberResult<Member>;

    /// Conditionally deactivate: succeeds only for an existing, currently
    /// active member and returns the id as confirmation. A missing or
    /// already-inactive member is `NotFound` either way.
    async fn deactivate(&self, id: Uuid, actor: &str, source: Source) -> MemberResult<Uuid>;

    async fn username_exists(&self, user_name: &str) -> MemberResult<bool>;

    async fn email_exists(&self, email: &str) -> MemberResult<bool>;

    async fn phone_exists(&self, phone: &str) -> MemberResult<bool>;

    /// Stamp the last successful login time
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> MemberResult<()>;

    /// One page of members matching the filters, plus the total match count.
    /// Filtering, sorting and offset/limit all happen storage-side.
    async fn get_paged(&self, query: MemberPageQuery) -> MemberResult<(Vec<Member>, u64)>;
}

/// In-memory implementation of MemberRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryMemberRepository {
    members: Arc<RwLock<HashMap<Uuid, Member>>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self {
            members: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn matches_filters(member: &Member, query: &MemberPageQuery) -> bool {
    if let Some(is_active) = query.is_active {
        if member.is_active != is_active {
            return false;
        }
    }
    if let Some(role) = query.role {
        if member.role != role {
            return false;
        }
    }
    if let Some(practice_id) = query.practice_id {
        if member.practice_id != Some(practice_id) {
            return false;
        }
    }
    true
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn add(&self, member: Member) -> MemberResult<Member> {
        let mut members = self.members.write().await;

        // Uniqueness backstop, mirroring the storage constraints
        if members
            .values()
            .any(|m| m.user_name.eq_ignore_ascii_case(&member.user_name))
        {
            return Err(MemberError::Conflict(DUPLICATE_USER_NAME.to_string()));
        }
        if members
            .values()
            .any(|m| m.email.eq_ignore_ascii_case(&member.email))
        {
            return Err(MemberError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        if let Some(phone) = member.phone_number.as_deref() {
            if members
                .values()
                .any(|m| m.phone_number.as_deref() == Some(phone))
            {
                return Err(MemberError::Conflict(DUPLICATE_PHONE.to_string()));
            }
        }

        members.insert(member.id, member.clone());

        tracing::info!(member_id = %member.id, user_name = %member.user_name, "Created member");
        Ok(member)
    }

    async fn get_by_id(&self, id: Uuid) -> MemberResult<Option<Member>> {
        let members = self.members.read().await;
        Ok(members.get(&id).cloned())
    }

    async fn get_by_username_or_email(&self, identifier: &str) -> MemberResult<Option<Member>> {
        let members = self.members.read().await;
        let member = members
            .values()
            .find(|m| {
                m.user_name.eq_ignore_ascii_case(identifier)
                    || m.email.eq_ignore_ascii_case(identifier)
            })
            .cloned();
        Ok(member)
    }

    async fn update(&self, member: Member) -> MemberResult<Member> {
        let mut members = self.members.write().await;

        if !members.contains_key(&member.id) {
            return Err(MemberError::NotFound);
        }

        if members
            .values()
            .any(|m| m.id != member.id && m.email.eq_ignore_ascii_case(&member.email))
        {
            return Err(MemberError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        if let Some(phone) = member.phone_number.as_deref() {
            if members
                .values()
                .any(|m| m.id != member.id && m.phone_number.as_deref() == Some(phone))
            {
                return Err(MemberError::Conflict(DUPLICATE_PHONE.to_string()));
            }
        }

        members.insert(member.id, member.clone());

        tracing::info!(member_id = %member.id, "Updated member");
        Ok(member)
    }

    async fn deactivate(&self, id: Uuid, actor: &str, source: Source) -> MemberResult<Uuid> {
        let mut members = self.members.write().await;

        match members.get_mut(&id) {
            Some(member) if member.is_active => {
                member.is_active = false;
                member.modified_by = actor.to_string();
                member.source = source;
                member.updated_at = Utc::now();
                tracing::info!(member_id = %id, "Deactivated member");
                Ok(id)
            }
            // Missing and already-inactive are reported identically
            _ => Err(MemberError::NotFound),
        }
    }

    async fn username_exists(&self, user_name: &str) -> MemberResult<bool> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .any(|m| m.user_name.eq_ignore_ascii_case(user_name)))
    }

    async fn email_exists(&self, email: &str) -> MemberResult<bool> {
        let members = self.members.read().await;
        Ok(members.values().any(|m| m.email.eq_ignore_ascii_case(email)))
    }

    async fn phone_exists(&self, phone: &str) -> MemberResult<bool> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .any(|m| m.phone_number.as_deref() == Some(phone)))
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> MemberResult<()> {
        let mut members = self.members.write().await;
        match members.get_mut(&id) {
            Some(member) => {
                member.last_login_at = Some(at);
                Ok(())
            }
            None => Err(MemberError::NotFound),
        }
    }

    async fn get_paged(&self, query: MemberPageQuery) -> MemberResult<(Vec<Member>, u64)> {
        let members = self.members.read().await;

        let mut matching: Vec<Member> = members
            .values()
            .filter(|m| matches_filters(m, &query))
            .cloned()
            .collect();

        let total_count = matching.len() as u64;

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::UserName => a.user_name.cmp(&b.user_name),
                SortField::FirstName => a.first_name.cmp(&b.first_name),
                SortField::LastName => a.last_name.cmp(&b.last_name),
                SortField::Email => a.email.cmp(&b.email),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page: Vec<Member> = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();

        Ok((page, total_count))
    }
}

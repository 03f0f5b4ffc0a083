//! Declarative field validation for member onboarding and updates.
//!
//! Every rule is evaluated independently and all violations are collected
//! into one `; `-joined message, so a caller sees every problem at once
//! instead of fixing them one round-trip at a time. The only side effects
//! are read-only existence lookups against the repository.

use core_config::members::MemberSettings;
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidateEmail;

use crate::error::{MemberError, MemberResult};
use crate::models::{CreateMember, UpdateMember};
use crate::repository::MemberRepository;

static USER_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap());

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

pub(crate) const DUPLICATE_USER_NAME: &str = "Duplicate entry found. UserName already exists.";
pub(crate) const DUPLICATE_EMAIL: &str = "Duplicate entry found. EmailAddress already exists.";
pub(crate) const DUPLICATE_PHONE: &str = "Duplicate entry found. PhoneNumber already exists.";

/// Validate a create request against the full rule catalog, including
/// uniqueness pre-checks. Storage holds the hard uniqueness constraints;
/// these lookups exist to give a friendly error before the insert.
pub(crate) async fn validate_create<R: MemberRepository>(
    repository: &R,
    settings: &MemberSettings,
    input: &CreateMember,
) -> MemberResult<()> {
    let mut violations = Vec::new();

    if input.user_name.is_empty() {
        violations.push("UserName is required.".to_string());
    } else {
        if !(5..=100).contains(&input.user_name.chars().count()) {
            violations.push("UserName must be min 5 chars and max 100 chars.".to_string());
        }
        if !USER_NAME_PATTERN.is_match(&input.user_name) {
            violations.push(
                "UserName may only contain letters, digits, '.', '_' and '-'.".to_string(),
            );
        }
        if repository.username_exists(&input.user_name).await? {
            violations.push(DUPLICATE_USER_NAME.to_string());
        }
    }

    if input.first_name.is_empty() {
        violations.push("First name is required.".to_string());
    } else if let Some(v) = name_length_violation("First name", &input.first_name) {
        violations.push(v);
    }

    if input.last_name.is_empty() {
        violations.push("Last name is required.".to_string());
    } else if let Some(v) = name_length_violation("Last name", &input.last_name) {
        violations.push(v);
    }

    if input.email.is_empty() {
        violations.push("EmailAddress is required.".to_string());
    } else {
        violations.extend(email_violations(settings, &input.email));
        if repository.email_exists(&input.email).await? {
            violations.push(DUPLICATE_EMAIL.to_string());
        }
    }

    if let Some(phone) = input.phone_number.as_deref().filter(|p| !p.is_empty()) {
        if !PHONE_PATTERN.is_match(phone) {
            violations.push("PhoneNumber must be exactly 10 digits.".to_string());
        }
        if repository.phone_exists(phone).await? {
            violations.push(DUPLICATE_PHONE.to_string());
        }
    }

    if input.practice_id.is_nil() {
        violations.push("Practice is required.".to_string());
    }

    if input.created_by.is_empty() {
        violations.push("CreatedBy is required.".to_string());
    }

    into_result(violations)
}

/// Validate a partial update: field rules apply only when the field is
/// supplied. Uniqueness is checked by the update flow itself, and only when
/// the value actually changes.
pub(crate) fn validate_update(settings: &MemberSettings, input: &UpdateMember) -> MemberResult<()> {
    let mut violations = Vec::new();

    if let Some(first_name) = input.first_name.as_deref() {
        if let Some(v) = name_length_violation("First name", first_name) {
            violations.push(v);
        }
    }

    if let Some(last_name) = input.last_name.as_deref() {
        if let Some(v) = name_length_violation("Last name", last_name) {
            violations.push(v);
        }
    }

    if let Some(email) = input.email.as_deref() {
        violations.extend(email_violations(settings, email));
    }

    if let Some(phone) = input.phone_number.as_deref() {
        if !PHONE_PATTERN.is_match(phone) {
            violations.push("PhoneNumber must be exactly 10 digits.".to_string());
        }
    }

    if input.modified_by.is_empty() {
        violations.push("ModifiedBy is required.".to_string());
    }

    into_result(violations)
}

fn name_length_violation(field: &str, value: &str) -> Option<String> {
    if (2..=50).contains(&value.chars().count()) {
        None
    } else {
        Some(format!("{field} must be min 2 chars and max 50 chars."))
    }
}

fn email_violations(settings: &MemberSettings, email: &str) -> Vec<String> {
    let mut violations = Vec::new();
    if !email.validate_email() {
        violations.push("EmailAddress must be a valid email address.".to_string());
    }
    if !email
        .to_lowercase()
        .ends_with(&settings.approved_email_domain.to_lowercase())
    {
        violations.push(format!(
            "EmailAddress must be in the {} domain.",
            settings.approved_email_domain.trim_start_matches('@')
        ));
    }
    violations
}

fn into_result(violations: Vec<String>) -> MemberResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(MemberError::Validation(violations.join("; ")))
    }
}

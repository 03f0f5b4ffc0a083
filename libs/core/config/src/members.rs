//! Member-domain settings.

use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};

/// Settings consumed by the member lifecycle and listing flows.
///
/// Loaded from environment variables:
/// - `MEMBER_APPROVED_EMAIL_DOMAIN` (default: "@example.com")
/// - `MEMBER_DEFAULT_PAGE_SIZE` (default: 25)
/// - `MEMBER_MAX_PAGE_SIZE` (default: 200)
/// - `MEMBER_GENERATED_PASSWORD_LEN` (default: 24)
#[derive(Clone, Debug)]
pub struct MemberSettings {
    /// Email addresses must end with this suffix (leading `@` included)
    pub approved_email_domain: String,
    /// Page size used when a listing request does not supply one
    pub default_page_size: u32,
    /// Upper bound for requested page sizes
    pub max_page_size: u32,
    /// Length of generated passwords for members onboarded without one
    pub generated_password_len: usize,
}

impl Default for MemberSettings {
    fn default() -> Self {
        Self {
            approved_email_domain: "@example.com".to_string(),
            default_page_size: 25,
            max_page_size: 200,
            generated_password_len: 24,
        }
    }
}

impl FromEnv for MemberSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            approved_email_domain: env_or_default(
                "MEMBER_APPROVED_EMAIL_DOMAIN",
                &defaults.approved_email_domain,
            ),
            default_page_size: env_parse_or_default(
                "MEMBER_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )?,
            max_page_size: env_parse_or_default("MEMBER_MAX_PAGE_SIZE", defaults.max_page_size)?,
            generated_password_len: env_parse_or_default(
                "MEMBER_GENERATED_PASSWORD_LEN",
                defaults.generated_password_len,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_settings_defaults() {
        temp_env::with_vars_unset(
            [
                "MEMBER_APPROVED_EMAIL_DOMAIN",
                "MEMBER_DEFAULT_PAGE_SIZE",
                "MEMBER_MAX_PAGE_SIZE",
            ],
            || {
                let settings = MemberSettings::from_env().unwrap();
                assert_eq!(settings.approved_email_domain, "@example.com");
                assert_eq!(settings.default_page_size, 25);
                assert_eq!(settings.max_page_size, 200);
            },
        );
    }

    #[test]
    fn test_member_settings_overrides() {
        temp_env::with_vars(
            [
                ("MEMBER_APPROVED_EMAIL_DOMAIN", Some("@slotiq.io")),
                ("MEMBER_DEFAULT_PAGE_SIZE", Some("50")),
            ],
            || {
                let settings = MemberSettings::from_env().unwrap();
                assert_eq!(settings.approved_email_domain, "@slotiq.io");
                assert_eq!(settings.default_page_size, 50);
            },
        );
    }

    #[test]
    fn test_member_settings_invalid_page_size() {
        temp_env::with_var("MEMBER_DEFAULT_PAGE_SIZE", Some("lots"), || {
            let settings = MemberSettings::from_env();
            assert!(matches!(settings, Err(ConfigError::ParseError { .. })));
        });
    }
}

//! User entity and onboarding input.

use chrono::{DateTime, Utc};
use expensa_shared::types::UserId;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::user::error::UserError;
use crate::workflow::role::{Role, RoleSet, parse_roles};
use crate::workflow::types::Actor;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email, stored lowercase.
    pub email: String,
    /// Granted roles.
    pub roles: RoleSet,
    /// Onboarding time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Acting identity of this user.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, &self.name, self.roles.iter().copied())
    }

    /// Role names, as carried in token claims.
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

/// Onboarding request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    /// Display name.
    #[garde(length(min = 1))]
    pub name: String,
    /// Email address.
    #[garde(email)]
    pub email: String,
    /// Role names; `EMPLOYEE` when omitted.
    #[serde(default)]
    #[garde(skip)]
    pub roles: Option<Vec<String>>,
}

impl NewUser {
    /// Validates the request and builds the user.
    ///
    /// # Errors
    /// `UserError::InvalidInput` for a blank name, a malformed email, an
    /// unknown role, or an explicitly empty role list.
    pub fn validate(self, now: DateTime<Utc>) -> Result<User, UserError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            roles: self.roles,
        };
        Validate::validate(&normalized).map_err(|report| {
            let (path, error) = report
                .iter()
                .next()
                .map(|(path, error)| (path.to_string(), error.to_string()))
                .unwrap_or_default();
            let field = if path == "name" { "name" } else { "email" };
            UserError::invalid(field, error)
        })?;
        let Self { name, email, roles } = normalized;

        let roles = match roles {
            None => RoleSet::from([Role::Employee]),
            Some(names) => {
                let roles = parse_roles(names.as_slice())
                    .map_err(|name| UserError::invalid("roles", format!("unknown role '{name}'")))?;
                if roles.is_empty() {
                    return Err(UserError::invalid("roles", "must not be empty"));
                }
                roles
            }
        };

        Ok(User {
            id: UserId::new(),
            name,
            email,
            roles,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(email: &str, roles: Option<Vec<&str>>) -> NewUser {
        NewUser {
            name: "  Morgan Lee ".to_string(),
            email: email.to_string(),
            roles: roles.map(|r| r.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_defaults_to_employee() {
        let user = request("Morgan@Example.com", None).validate(Utc::now()).unwrap();
        assert_eq!(user.name, "Morgan Lee");
        assert_eq!(user.email, "morgan@example.com");
        assert_eq!(user.roles, RoleSet::from([Role::Employee]));
        assert_eq!(user.role_names(), vec!["EMPLOYEE"]);
    }

    #[test]
    fn test_actor_keeps_roles() {
        let user = request("m@example.com", Some(vec!["employee", "MANAGER"]))
            .validate(Utc::now())
            .unwrap();
        let actor = user.actor();
        assert_eq!(actor.user_id, user.id);
        assert_eq!(actor.level(), 1);
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("@example.com")]
    #[case("a@@example.com")]
    #[case("a b@example.com")]
    #[case("")]
    fn test_rejects_bad_email(#[case] email: &str) {
        let err = request(email, None).validate(Utc::now()).unwrap_err();
        assert!(matches!(err, UserError::InvalidInput { field: "email", .. }));
    }

    #[test]
    fn test_email_is_trimmed_before_checking() {
        let user = request("  Ada@Example.org ", None).validate(Utc::now()).unwrap();
        assert_eq!(user.email, "ada@example.org");
    }

    #[test]
    fn test_rejects_blank_name() {
        let mut req = request("m@example.com", None);
        req.name = "   ".to_string();
        let err = req.validate(Utc::now()).unwrap_err();
        assert!(matches!(err, UserError::InvalidInput { field: "name", .. }));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["AUDITOR"])]
    fn test_rejects_bad_roles(#[case] roles: Vec<&str>) {
        let err = request("m@example.com", Some(roles)).validate(Utc::now()).unwrap_err();
        assert!(matches!(err, UserError::InvalidInput { field: "roles", .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(UserError::EmailTaken("a@b.c".into()).status_code(), 409);
        assert_eq!(UserError::EmailTaken("a@b.c".into()).error_code(), "EMAIL_TAKEN");
        assert_eq!(UserError::NotFound(UserId::new()).error_code(), "USER_NOT_FOUND");
    }
}

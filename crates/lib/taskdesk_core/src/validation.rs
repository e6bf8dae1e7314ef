//! Input validation.
//!
//! Validators return accumulated violation messages instead of raising;
//! each identity operation consumes the result explicitly before doing
//! anything else. Role names are checked against the closed enumerations
//! here, never at authorization time.

use crate::models::identity::{CreateUserInput, LoginInput, RegisterInput, SystemRole, UpdateUserInput};

/// Minimum password length, matching the desktop client's form rule.
const MIN_PASSWORD_LEN: usize = 8;

/// Check login credentials for shape only — no lookup happens here.
pub fn validate_login(input: &LoginInput) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if input.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    }
    if input.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check a self-service registration payload.
pub fn validate_register(input: &RegisterInput) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    check_username(&input.username, &mut errors);
    check_password(&input.password, &mut errors);
    check_display_name(&input.display_name, &mut errors);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check an admin user-creation payload; on success, returns the parsed
/// role set.
pub fn validate_create_user(input: &CreateUserInput) -> Result<Vec<SystemRole>, Vec<String>> {
    let mut errors = Vec::new();
    check_username(&input.username, &mut errors);
    check_password(&input.password, &mut errors);
    check_display_name(&input.display_name, &mut errors);
    let roles = parse_roles(&input.roles, &mut errors);
    if errors.is_empty() { Ok(roles) } else { Err(errors) }
}

/// Check an admin user-update payload; on success, returns the parsed
/// replacement role set, if one was supplied.
pub fn validate_update_user(
    input: &UpdateUserInput,
) -> Result<Option<Vec<SystemRole>>, Vec<String>> {
    let mut errors = Vec::new();
    if let Some(display_name) = &input.display_name {
        check_display_name(display_name, &mut errors);
    }
    if let Some(password) = &input.password {
        check_password(password, &mut errors);
    }
    let roles = input
        .roles
        .as_ref()
        .map(|names| parse_roles(names, &mut errors));
    if errors.is_empty() { Ok(roles) } else { Err(errors) }
}

fn check_username(username: &str, errors: &mut Vec<String>) {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        errors.push("Username is required".to_string());
    } else if trimmed != username {
        errors.push("Username must not have leading or trailing whitespace".to_string());
    }
}

fn check_password(password: &str, errors: &mut Vec<String>) {
    if password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
}

fn check_display_name(display_name: &str, errors: &mut Vec<String>) {
    if display_name.trim().is_empty() {
        errors.push("Display name is required".to_string());
    }
}

/// Parse role names against the closed [`SystemRole`] set, deduplicating
/// and accumulating one violation per unrecognized name.
fn parse_roles(names: &[String], errors: &mut Vec<String>) -> Vec<SystemRole> {
    let mut roles = Vec::new();
    for name in names {
        match name.parse::<SystemRole>() {
            Ok(role) => {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
            Err(message) => errors.push(message),
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&LoginInput {
            username: " ".into(),
            password: "".into(),
        })
        .unwrap_err();
        assert_eq!(2, errors.len());

        assert!(
            validate_login(&LoginInput {
                username: "alice".into(),
                password: "pw".into(),
            })
            .is_ok()
        );
    }

    #[test]
    fn register_rejects_short_passwords() {
        let errors = validate_register(&RegisterInput {
            username: "alice".into(),
            password: "short".into(),
            display_name: "Alice".into(),
        })
        .unwrap_err();
        assert_eq!(vec!["Password must be at least 8 characters"], errors);
    }

    #[test]
    fn create_user_parses_and_dedups_roles() {
        let roles = validate_create_user(&CreateUserInput {
            username: "bob".into(),
            password: "longenough".into(),
            display_name: "Bob".into(),
            roles: vec!["viewer".into(), "admin".into(), "viewer".into()],
        })
        .unwrap();
        assert_eq!(vec![SystemRole::Viewer, SystemRole::Admin], roles);
    }

    #[test]
    fn unknown_role_names_are_violations() {
        let errors = validate_create_user(&CreateUserInput {
            username: "bob".into(),
            password: "longenough".into(),
            display_name: "Bob".into(),
            roles: vec!["viewer".into(), "superuser".into()],
        })
        .unwrap_err();
        assert_eq!(vec!["Unknown system role 'superuser'"], errors);
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        let roles = validate_update_user(&UpdateUserInput::default()).unwrap();
        assert!(roles.is_none());
    }

    #[test]
    fn update_roles_replace_set_is_parsed() {
        let input = UpdateUserInput {
            roles: Some(vec!["maintainer".into(), "contributor".into()]),
            ..Default::default()
        };
        let roles = validate_update_user(&input).unwrap().unwrap();
        assert_eq!(vec![SystemRole::Maintainer, SystemRole::Contributor], roles);
    }
}

use crate::{
    api::{ApiError, LoginRequest, RegisterRequest, ResetPasswordRequest},
    utils::validation,
};
use leptos::*;
use serde_json::json;

/// Seconds before another reset code may be requested.
pub const RESET_CODE_COOLDOWN_SECS: u32 = 60;

#[derive(Clone, Copy)]
pub struct LoginFormState {
    pub username: RwSignal<String>,
    pub password: RwSignal<String>,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            username: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
        }
    }
}

impl LoginFormState {
    pub fn to_request(&self) -> Result<LoginRequest, ApiError> {
        validate_login(&self.username.get_untracked(), &self.password.get_untracked())
    }
}

#[derive(Clone, Copy)]
pub struct RegisterFormState {
    pub username: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm: RwSignal<String>,
}

impl Default for RegisterFormState {
    fn default() -> Self {
        Self {
            username: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
            confirm: create_rw_signal(String::new()),
        }
    }
}

impl RegisterFormState {
    pub fn to_request(&self) -> Result<RegisterRequest, ApiError> {
        validate_registration(
            &self.username.get_untracked(),
            &self.email.get_untracked(),
            &self.password.get_untracked(),
            &self.confirm.get_untracked(),
        )
    }

    pub fn clear(&self) {
        for field in [self.username, self.email, self.password, self.confirm] {
            field.set(String::new());
        }
    }
}

#[derive(Clone, Copy)]
pub struct ResetFormState {
    pub email: RwSignal<String>,
    pub code: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm: RwSignal<String>,
    /// Set once a code has been sent; switches the form to its second step.
    pub code_sent: RwSignal<bool>,
    pub cooldown: RwSignal<u32>,
}

impl Default for ResetFormState {
    fn default() -> Self {
        Self {
            email: create_rw_signal(String::new()),
            code: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
            confirm: create_rw_signal(String::new()),
            code_sent: create_rw_signal(false),
            cooldown: create_rw_signal(0),
        }
    }
}

impl ResetFormState {
    pub fn to_request(&self) -> Result<ResetPasswordRequest, ApiError> {
        validate_reset(
            &self.email.get_untracked(),
            &self.code.get_untracked(),
            &self.password.get_untracked(),
            &self.confirm.get_untracked(),
        )
    }

    pub fn can_request_code(&self) -> bool {
        self.cooldown.get() == 0
    }

    pub fn clear(&self) {
        for field in [self.email, self.code, self.password, self.confirm] {
            field.set(String::new());
        }
        self.code_sent.set(false);
    }
}

fn rule_errors(message: &str, errors: Vec<String>) -> ApiError {
    ApiError {
        data: Some(json!({ "errors": errors })),
        ..ApiError::validation(message)
    }
}

pub fn validate_login(username: &str, password: &str) -> Result<LoginRequest, ApiError> {
    validation::validate_username(username).map_err(ApiError::validation)?;
    if password.is_empty() {
        return Err(ApiError::validation("Please enter a password"));
    }
    if password.chars().count() < validation::LOGIN_PASSWORD_MIN_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            validation::LOGIN_PASSWORD_MIN_LEN
        )));
    }
    Ok(LoginRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    validation::validate_new_password(password)
        .map_err(|errors| rule_errors("The password is too weak", errors))?;
    validation::validate_confirmation(password, confirm).map_err(ApiError::validation)
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<RegisterRequest, ApiError> {
    validation::validate_username(username).map_err(ApiError::validation)?;
    validation::validate_email(email).map_err(ApiError::validation)?;
    validate_new_password(password, confirm)?;
    Ok(RegisterRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
        email: email.trim().to_string(),
    })
}

pub fn validate_reset_email(email: &str) -> Result<String, ApiError> {
    validation::validate_email(email).map_err(ApiError::validation)?;
    Ok(email.trim().to_string())
}

pub fn validate_reset(
    email: &str,
    code: &str,
    password: &str,
    confirm: &str,
) -> Result<ResetPasswordRequest, ApiError> {
    let email = validate_reset_email(email)?;
    validation::validate_reset_code(code).map_err(ApiError::validation)?;
    validate_new_password(password, confirm)?;
    Ok(ResetPasswordRequest {
        email,
        code: code.trim().to_string(),
        new_password: password.to_string(),
    })
}

pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 | 1 => "Weak",
        2 => "Fair",
        3 => "Good",
        _ => "Strong",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;

    #[test]
    fn login_requires_username_and_password() {
        assert!(validate_login("", "secret123").is_err());
        assert!(validate_login("al", "secret123").is_err());
        assert!(validate_login("alice", "").is_err());
        assert!(validate_login("alice", "12345").is_err());
        let request = validate_login("  alice ", "secret123").unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret123");
    }

    #[test]
    fn registration_lists_every_broken_password_rule() {
        let err = validate_registration("alice", "alice@example.com", "short", "short").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let errors = err.data.unwrap()["errors"].as_array().unwrap().len();
        assert!(errors >= 3);
    }

    #[test]
    fn registration_checks_confirmation() {
        let err = validate_registration("alice", "alice@example.com", "Str0ng!pw", "Str0ng!px")
            .unwrap_err();
        assert_eq!(err.message, "The two passwords do not match");
        let ok = validate_registration("alice", " alice@example.com ", "Str0ng!pw", "Str0ng!pw")
            .unwrap();
        assert_eq!(ok.email, "alice@example.com");
    }

    #[test]
    fn reset_needs_six_digit_code() {
        assert!(validate_reset("alice@example.com", "12a456", "Str0ng!pw", "Str0ng!pw").is_err());
        assert!(validate_reset("alice@example.com", "12345", "Str0ng!pw", "Str0ng!pw").is_err());
        let ok = validate_reset("alice@example.com", "123456", "Str0ng!pw", "Str0ng!pw").unwrap();
        assert_eq!(ok.code, "123456");
        assert_eq!(ok.new_password, "Str0ng!pw");
    }

    #[test]
    fn strength_labels_cover_the_scale() {
        assert_eq!(strength_label(0), "Weak");
        assert_eq!(strength_label(2), "Fair");
        assert_eq!(strength_label(3), "Good");
        assert_eq!(strength_label(4), "Strong");
    }
}

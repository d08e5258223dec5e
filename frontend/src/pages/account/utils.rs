use crate::{
    api::{ApiError, ChangePasswordRequest, User},
    pages::login::utils::validate_new_password,
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct PasswordFormState {
    pub current: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm: RwSignal<String>,
}

impl Default for PasswordFormState {
    fn default() -> Self {
        Self {
            current: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
            confirm: create_rw_signal(String::new()),
        }
    }
}

impl PasswordFormState {
    pub fn to_request(&self) -> Result<ChangePasswordRequest, ApiError> {
        validate_password_change(
            &self.current.get_untracked(),
            &self.password.get_untracked(),
            &self.confirm.get_untracked(),
        )
    }

    pub fn clear(&self) {
        for field in [self.current, self.password, self.confirm] {
            field.set(String::new());
        }
    }
}

pub fn validate_password_change(
    current: &str,
    password: &str,
    confirm: &str,
) -> Result<ChangePasswordRequest, ApiError> {
    if current.is_empty() {
        return Err(ApiError::validation("Please enter your current password"));
    }
    validate_new_password(password, confirm)?;
    if password == current {
        return Err(ApiError::validation(
            "The new password must differ from the current one",
        ));
    }
    Ok(ChangePasswordRequest {
        old_password: current.to_string(),
        new_password: password.to_string(),
    })
}

/// Label/value rows shown on the profile card.
pub fn profile_rows(user: &User) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Username", user.username.clone()),
        ("Role", user.role.clone()),
    ];
    if let Some(email) = &user.email {
        rows.push(("Email", email.clone()));
    }
    if let Some(employee_id) = user.employee_id {
        rows.push(("Employee ID", employee_id.to_string()));
    }
    rows
}

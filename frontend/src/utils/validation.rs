//! Client-side form constraints checked before any request is sent.

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const LOGIN_PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;
pub const RESET_CODE_LEN: usize = 6;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.trim().chars().count();
    if len == 0 {
        return Err("Please enter a username".into());
    }
    if len < USERNAME_MIN_LEN {
        return Err(format!(
            "Username must be at least {} characters",
            USERNAME_MIN_LEN
        ));
    }
    if len > USERNAME_MAX_LEN {
        return Err(format!(
            "Username must be at most {} characters",
            USERNAME_MAX_LEN
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Please enter an email address".into());
    }
    if !is_email(email) {
        return Err("Please enter a valid email address".into());
    }
    Ok(())
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

pub fn validate_reset_code(code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Please enter the verification code".into());
    }
    if code.len() != RESET_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "The verification code is {} digits",
            RESET_CODE_LEN
        ));
    }
    Ok(())
}

fn is_special(c: char) -> bool {
    PASSWORD_SPECIAL_CHARS.contains(c)
}

/// Every rule the password breaks, in a stable order.
pub fn password_violations(password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        errors.push(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
    if len > PASSWORD_MAX_LEN {
        errors.push(format!(
            "Password must be at most {} characters",
            PASSWORD_MAX_LEN
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain an uppercase letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain a lowercase letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain a digit".into());
    }
    if !password.chars().any(is_special) {
        errors.push(format!(
            "Password must contain a special character ({})",
            PASSWORD_SPECIAL_CHARS
        ));
    }
    errors
}

pub fn validate_new_password(password: &str) -> Result<(), Vec<String>> {
    let errors = password_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// 0..=4, one point each for length, uppercase, digit and special character.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= PASSWORD_MIN_LEN,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(is_special),
    ];
    checks.iter().filter(|ok| **ok).count() as u8
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if confirmation.is_empty() {
        return Err("Please confirm the password".into());
    }
    if password != confirmation {
        return Err("The two passwords do not match".into());
    }
    Ok(())
}

use serde::Deserialize;

/// Registration form. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub remember_me: Option<String>,
}

impl LoginForm {
    /// Checkbox semantics: present and "on" (or a truthy value).
    pub fn remember(&self) -> bool {
        matches!(self.remember_me.as_deref(), Some("on" | "true" | "1"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_me_checkbox() {
        let mut form = LoginForm::default();
        assert!(!form.remember());
        form.remember_me = Some("on".into());
        assert!(form.remember());
        form.remember_me = Some("off".into());
        assert!(!form.remember());
    }
}

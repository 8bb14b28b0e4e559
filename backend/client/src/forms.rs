//! Auth form state.
//!
//! The register and login screens keep their input in one [`AuthForms`]
//! value. Every edit goes through [`reduce`] as an [`AuthAction`], so the
//! screens never mutate the state directly and can diff old against new.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormKind {
    Register,
    Login,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Username,
    Password,
    PasswordConfirm,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthForms {
    pub register: RegisterForm,
    pub login: LoginForm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AuthAction {
    #[serde(rename = "auth/CHANGE_FIELD")]
    ChangeField {
        form: FormKind,
        key: Field,
        value: String,
    },

    #[serde(rename = "auth/INITIALIZE_FORM")]
    InitializeForm(FormKind),
}

pub fn change_field(form: FormKind, key: Field, value: impl Into<String>) -> AuthAction {
    AuthAction::ChangeField {
        form,
        key,
        value: value.into(),
    }
}

pub fn initialize_form(form: FormKind) -> AuthAction {
    AuthAction::InitializeForm(form)
}

/// Returns the next state; the previous one is left untouched. Setting a key
/// a form doesn't have (login has no confirmation) is a no-op.
pub fn reduce(state: &AuthForms, action: AuthAction) -> AuthForms {
    let mut next = state.clone();

    match action {
        AuthAction::ChangeField { form, key, value } => match (form, key) {
            (FormKind::Register, Field::Username) => next.register.username = value,
            (FormKind::Register, Field::Password) => next.register.password = value,
            (FormKind::Register, Field::PasswordConfirm) => next.register.password_confirm = value,
            (FormKind::Login, Field::Username) => next.login.username = value,
            (FormKind::Login, Field::Password) => next.login.password = value,
            (FormKind::Login, Field::PasswordConfirm) => {}
        },
        AuthAction::InitializeForm(FormKind::Register) => next.register = RegisterForm::default(),
        AuthAction::InitializeForm(FormKind::Login) => next.login = LoginForm::default(),
    }

    next
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in every field")]
    EmptyField(Field),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

fn filled(field: Field, value: &str) -> Result<(), FormError> {
    if value.is_empty() {
        return Err(FormError::EmptyField(field));
    }

    Ok(())
}

impl RegisterForm {
    pub fn credentials(&self) -> Result<Credentials, FormError> {
        filled(Field::Username, &self.username)?;
        filled(Field::Password, &self.password)?;
        filled(Field::PasswordConfirm, &self.password_confirm)?;

        if self.password != self.password_confirm {
            return Err(FormError::PasswordMismatch);
        }

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl LoginForm {
    pub fn credentials(&self) -> Result<Credentials, FormError> {
        filled(Field::Username, &self.username)?;
        filled(Field::Password, &self.password)?;

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_change_field_touches_one_form() {
        let state = AuthForms::default();
        let next = reduce(&state, change_field(FormKind::Register, Field::Username, "kdcdev"));

        assert_eq!(next.register.username, "kdcdev");
        assert_eq!(next.login, LoginForm::default());
        assert_eq!(state, AuthForms::default());
    }

    #[test]
    fn test_login_has_no_confirmation() {
        let state = AuthForms::default();
        let next = reduce(&state, change_field(FormKind::Login, Field::PasswordConfirm, "x"));
        assert_eq!(next, state);
    }

    #[test]
    fn test_initialize_resets_only_that_form() {
        let mut state = AuthForms::default();
        for action in [
            change_field(FormKind::Register, Field::Username, "a"),
            change_field(FormKind::Login, Field::Username, "b"),
        ] {
            state = reduce(&state, action);
        }

        let next = reduce(&state, initialize_form(FormKind::Register));
        assert_eq!(next.register, RegisterForm::default());
        assert_eq!(next.login.username, "b");
    }

    #[test]
    fn test_action_wire_format() {
        let action = change_field(FormKind::Register, Field::PasswordConfirm, "pw");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "auth/CHANGE_FIELD",
                "payload": { "form": "register", "key": "passwordConfirm", "value": "pw" }
            })
        );

        let parsed: AuthAction =
            serde_json::from_value(json!({ "type": "auth/INITIALIZE_FORM", "payload": "login" }))
                .unwrap();
        assert_eq!(parsed, initialize_form(FormKind::Login));
    }

    #[test]
    fn test_register_credentials() {
        let mut form = RegisterForm {
            username: "kdcdev".to_string(),
            password: "pw".to_string(),
            password_confirm: "pw".to_string(),
        };
        assert_eq!(form.credentials().unwrap().username, "kdcdev");

        form.password_confirm = "other".to_string();
        assert_eq!(form.credentials(), Err(FormError::PasswordMismatch));

        form.username.clear();
        assert_eq!(
            form.credentials(),
            Err(FormError::EmptyField(Field::Username))
        );
    }

    #[test]
    fn test_login_credentials() {
        let form = LoginForm {
            username: "kdcdev".to_string(),
            password: String::new(),
        };
        assert_eq!(
            form.credentials(),
            Err(FormError::EmptyField(Field::Password))
        );
    }
}

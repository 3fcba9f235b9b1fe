use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::auth::dto::{LoginRequest, SignUpRequest};

/// One message per violated field, keyed by the wire-form field name.
/// BTreeMap keeps the mapping deterministic.
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Wire-form field names paired with their submitted values; absent and
/// present-but-empty are distinguished only by the `Required` rule.
type Fields<'a> = [(&'static str, Option<&'a str>)];

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// A single validation rule. Rules run in order per field; the first
/// violation wins for that field.
enum Rule {
    Required,
    Email,
    Min(usize),
    /// Value must equal another field's value; `display` is the name used
    /// in the message.
    EqField {
        other: &'static str,
        display: &'static str,
    },
}

struct FieldSpec {
    name: &'static str,
    rules: &'static [Rule],
}

const SIGN_UP_RULES: &[FieldSpec] = &[
    FieldSpec {
        name: "first_name",
        rules: &[Rule::Required, Rule::Min(3)],
    },
    FieldSpec {
        name: "email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldSpec {
        name: "password",
        rules: &[Rule::Required, Rule::Min(8)],
    },
    FieldSpec {
        name: "confirm_password",
        rules: &[
            Rule::Required,
            Rule::EqField {
                other: "password",
                display: "Password",
            },
        ],
    },
];

const LOGIN_RULES: &[FieldSpec] = &[
    FieldSpec {
        name: "email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldSpec {
        name: "password",
        rules: &[Rule::Required],
    },
];

fn lookup<'a>(fields: &Fields<'a>, name: &str) -> Option<&'a str> {
    fields.iter().find(|(n, _)| *n == name).and_then(|(_, v)| *v)
}

impl Rule {
    fn check(&self, field: &'static str, value: Option<&str>, fields: &Fields<'_>) -> Option<String> {
        match self {
            Rule::Required => {
                let missing = value.map_or(true, str::is_empty);
                missing.then(|| format!("{field} is required"))
            }
            Rule::Email => {
                let v = value.unwrap_or("");
                (!EMAIL_RE.is_match(v)).then(|| format!("{field} must be a valid email address"))
            }
            Rule::Min(n) => {
                let v = value.unwrap_or("");
                (v.chars().count() < *n)
                    .then(|| format!("{field} must be at least {n} characters long"))
            }
            Rule::EqField { other, display } => {
                let v = value.unwrap_or("");
                let o = lookup(fields, other).unwrap_or("");
                (v != o).then(|| format!("{field} must be equal to {display}"))
            }
        }
    }
}

fn run(specs: &[FieldSpec], fields: &Fields<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for spec in specs {
        let value = lookup(fields, spec.name);
        for rule in spec.rules {
            if let Some(message) = rule.check(spec.name, value, fields) {
                errors.insert(spec.name, message);
                break;
            }
        }
    }
    errors
}

/// Sign-up payload after validation.
#[derive(Debug)]
pub struct ValidSignUp {
    pub email: String,
    pub password: String,
}

/// Login payload after validation.
#[derive(Debug)]
pub struct ValidLogin {
    pub email: String,
    pub password: String,
}

pub fn validate_sign_up(req: &SignUpRequest) -> Result<ValidSignUp, ValidationErrors> {
    let fields = [
        ("first_name", req.first_name.as_deref()),
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
        ("confirm_password", req.confirm_password.as_deref()),
    ];
    let errors = run(SIGN_UP_RULES, &fields);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidSignUp {
        email: req.email.clone().unwrap_or_default(),
        password: req.password.clone().unwrap_or_default(),
    })
}

pub fn validate_login(req: &LoginRequest) -> Result<ValidLogin, ValidationErrors> {
    let fields = [
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
    ];
    let errors = run(LOGIN_RULES, &fields);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidLogin {
        email: req.email.clone().unwrap_or_default(),
        password: req.password.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(
        first_name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        confirm_password: Option<&str>,
    ) -> SignUpRequest {
        SignUpRequest {
            first_name: first_name.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
            confirm_password: confirm_password.map(str::to_string),
        }
    }

    #[test]
    fn valid_sign_up_passes() {
        let req = sign_up(
            Some("Ada"),
            Some("a@x.io"),
            Some("password1"),
            Some("password1"),
        );
        let valid = validate_sign_up(&req).expect("should validate");
        assert_eq!(valid.email, "a@x.io");
        assert_eq!(valid.password, "password1");
    }

    #[test]
    fn missing_fields_are_required() {
        let req = sign_up(None, None, None, None);
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(errors["first_name"], "first_name is required");
        assert_eq!(errors["email"], "email is required");
        assert_eq!(errors["password"], "password is required");
        assert_eq!(errors["confirm_password"], "confirm_password is required");
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let req = sign_up(Some(""), Some("a@x.io"), Some("password1"), Some("password1"));
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(errors["first_name"], "first_name is required");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn short_first_name_is_rejected() {
        let req = sign_up(Some("Al"), Some("a@x.io"), Some("password1"), Some("password1"));
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(
            errors["first_name"],
            "first_name must be at least 3 characters long"
        );
    }

    #[test]
    fn bad_email_syntax_is_rejected() {
        let req = sign_up(Some("Ada"), Some("not-an-email"), Some("password1"), Some("password1"));
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(errors["email"], "email must be a valid email address");
    }

    #[test]
    fn short_password_is_rejected() {
        let req = sign_up(Some("Ada"), Some("a@x.io"), Some("short"), Some("short"));
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(
            errors["password"],
            "password must be at least 8 characters long"
        );
    }

    #[test]
    fn mismatched_confirmation_uses_display_name() {
        let req = sign_up(
            Some("Ada"),
            Some("a@x.io"),
            Some("password1"),
            Some("password2"),
        );
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(
            errors["confirm_password"],
            "confirm_password must be equal to Password"
        );
    }

    #[test]
    fn first_violation_wins_per_field() {
        // Missing password: the required rule fires, not min.
        let req = sign_up(Some("Ada"), Some("a@x.io"), None, Some("password1"));
        let errors = validate_sign_up(&req).unwrap_err();
        assert_eq!(errors["password"], "password is required");
    }

    #[test]
    fn login_rules() {
        let req = LoginRequest {
            email: Some("a@x.io".into()),
            password: Some("whatever".into()),
        };
        assert!(validate_login(&req).is_ok());

        let req = LoginRequest {
            email: Some("nope".into()),
            password: None,
        };
        let errors = validate_login(&req).unwrap_err();
        assert_eq!(errors["email"], "email must be a valid email address");
        assert_eq!(errors["password"], "password is required");
    }
}

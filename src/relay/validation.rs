//! Field rules for contact and quote submissions

use crate::models::{ContactForm, ContactSubmission, QuoteForm, QuoteSubmission, ValidationErrors};
use regex::Regex;
use std::sync::LazyLock;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const PLAN_REQUIRED: &str = "Plan selection is required";

// Leading dots and ".." are rejected separately in is_valid_email
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").ok()
});

/// Syntactic email check
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.')
        && !email.contains("..")
        && EMAIL_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(email))
}

/// Trimmed value, or `None` when absent or blank
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str, message: &str, errors: &mut ValidationErrors) -> String {
    match present(value) {
        Some(v) => v,
        None => {
            errors.push(field, message);
            String::new()
        }
    }
}

fn email(value: Option<String>, errors: &mut ValidationErrors) -> String {
    match present(value) {
        Some(v) if is_valid_email(&v) => v,
        _ => {
            errors.push("email", EMAIL_INVALID);
            String::new()
        }
    }
}

/// Validate a contact form, collecting every failed rule
pub fn validate_contact(form: ContactForm) -> Result<ContactSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required(form.name, "name", NAME_REQUIRED, &mut errors);
    let email = email(form.email, &mut errors);
    let message = required(form.message, "message", MESSAGE_REQUIRED, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactSubmission { name, email, message })
}

/// Validate a quote request, collecting every failed rule
pub fn validate_quote(form: QuoteForm) -> Result<QuoteSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required(form.name, "name", NAME_REQUIRED, &mut errors);
    let email = email(form.email, &mut errors);
    let plan = required(form.plan, "plan", PLAN_REQUIRED, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(QuoteSubmission {
        name,
        email,
        phone: present(form.phone),
        address: present(form.address),
        plan,
        message: present(form.message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn contact(name: Option<&str>, email: Option<&str>, message: Option<&str>) -> ContactForm {
        ContactForm {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+isp@mail.thillaicable.co.in"));
        assert!(is_valid_email("o'neil@example.org"));
        assert!(is_valid_email("UPPER@EXAMPLE.COM"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email(".a@b.com"));
        assert!(!is_valid_email("a..b@b.com"));
        assert!(!is_valid_email("a.@b.com"));
        assert!(!is_valid_email("a@-b.com"));
        assert!(!is_valid_email("a b@b.com"));
        assert!(!is_valid_email("a@b.com "));
    }

    #[test]
    fn test_valid_contact() {
        let submission = validate_contact(contact(Some("A"), Some("a@b.com"), Some("hi"))).unwrap();
        assert_eq!(submission.name, "A");
        assert_eq!(submission.email, "a@b.com");
        assert_eq!(submission.message, "hi");
    }

    #[test]
    fn test_contact_values_are_trimmed() {
        let submission = validate_contact(contact(Some("  Priya "), Some(" p@b.com "), Some(" hello\n"))).unwrap();
        assert_eq!(submission.name, "Priya");
        assert_eq!(submission.email, "p@b.com");
        assert_eq!(submission.message, "hello");
    }

    #[test]
    fn test_contact_missing_everything() {
        let errors = validate_contact(ContactForm::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("message"));
        assert_eq!(errors.errors()[0].message, NAME_REQUIRED);
    }

    #[test]
    fn test_contact_blank_message() {
        let errors = validate_contact(contact(Some("A"), Some("a@b.com"), Some("   "))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "message");
        assert_eq!(errors.errors()[0].message, MESSAGE_REQUIRED);
    }

    #[test]
    fn test_contact_invalid_email() {
        let errors = validate_contact(contact(Some("A"), Some("not-an-email"), Some("hi"))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "email");
        assert_eq!(errors.errors()[0].message, EMAIL_INVALID);
    }

    #[test]
    fn test_quote_requires_plan() {
        let form = QuoteForm {
            name: Some("A".to_string()),
            email: Some("a@b.com".to_string()),
            ..QuoteForm::default()
        };
        let errors = validate_quote(form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "plan");
        assert_eq!(errors.errors()[0].message, PLAN_REQUIRED);
    }

    #[test]
    fn test_quote_optional_fields() {
        let form = QuoteForm {
            name: Some("A".to_string()),
            email: Some("a@b.com".to_string()),
            phone: Some("  ".to_string()),
            address: Some(" 12 Main Road ".to_string()),
            plan: Some("premium".to_string()),
            message: None,
        };
        let submission = validate_quote(form).unwrap();
        assert_eq!(submission.phone, None);
        assert_eq!(submission.address.as_deref(), Some("12 Main Road"));
        assert_eq!(submission.message, None);
        assert_eq!(submission.plan, "premium");
    }

    #[test]
    fn test_quote_message_not_required() {
        let form = QuoteForm {
            name: Some("A".to_string()),
            email: Some("a@b.com".to_string()),
            plan: Some("basic".to_string()),
            ..QuoteForm::default()
        };
        assert!(validate_quote(form).is_ok());
    }

    proptest! {
        #[test]
        fn prop_strings_without_at_are_invalid(s in "[^@]*") {
            prop_assert!(!is_valid_email(&s));
        }

        #[test]
        fn prop_simple_addresses_are_valid(
            local in "[a-z0-9]{1,16}",
            domain in "[a-z0-9]{1,16}",
            tld in "[a-z]{2,6}",
        ) {
            let address = format!("{}@{}.{}", local, domain, tld);
            prop_assert!(is_valid_email(&address));
        }
    }
}

//! Profile value object.

use serde::{Deserialize, Serialize};

/// The user-supplied registration fields.
///
/// All four fields are free text; `age` in particular is stored exactly as
/// entered and never interpreted as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: String,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            age: age.into(),
        }
    }

    /// Sets a field by its case-insensitive name.
    ///
    /// Returns false when the name matches no profile field.
    pub(super) fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = if field.eq_ignore_ascii_case("name") {
            &mut self.name
        } else if field.eq_ignore_ascii_case("surname") {
            &mut self.surname
        } else if field.eq_ignore_ascii_case("email") {
            &mut self.email
        } else if field.eq_ignore_ascii_case("age") {
            &mut self.age
        } else {
            return false;
        };
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_ignores_case() {
        let mut profile = Profile::default();
        assert!(profile.set_field("NAME", "John".to_string()));
        assert!(profile.set_field("SurName", "Doe".to_string()));
        assert!(profile.set_field("eMail", "john@example.com".to_string()));
        assert!(profile.set_field("Age", "30".to_string()));

        assert_eq!(profile, Profile::new("John", "Doe", "john@example.com", "30"));
    }

    #[test]
    fn set_field_rejects_unknown_names() {
        let mut profile = Profile::default();
        assert!(!profile.set_field("nickname", "JD".to_string()));
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn profile_serializes_with_lowercase_names() {
        let json = serde_json::to_value(Profile::new("John", "Doe", "j@d.com", "30")).unwrap();
        assert_eq!(json["name"], "John");
        assert_eq!(json["age"], "30");
    }
}

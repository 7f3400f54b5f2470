//! User records as exchanged with the remote user service.

use serde::{Deserialize, Serialize};

pub type UserId = u64;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub geo: Geo,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}

/// A user as held in the dashboard. The identifier is assigned by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

impl User {
    /// Avatar text: first letter of every word of the name, uppercased.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Payload of a create request: a user without an identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub company: Company,
}

impl NewUser {
    /// Build the payload the add-user form submits. Address and the rest of
    /// the company are left empty.
    pub fn from_form(
        name: &str,
        username: &str,
        email: &str,
        phone: &str,
        website: &str,
        company_name: &str,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            website: website.trim().to_string(),
            address: Address::default(),
            company: Company {
                name: company_name.trim().to_string(),
                ..Company::default()
            },
        }
    }

    /// Required-field presence check. Returns the first blank field.
    pub fn validate(&self) -> Result<(), &'static str> {
        let required = [
            ("name", &self.name),
            ("username", &self.username),
            ("email", &self.email),
            ("phone", &self.phone),
            ("website", &self.website),
            ("company name", &self.company.name),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(*field),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_letter_of_each_word() {
        let u = User { name: "leanne graham".into(), ..User::default() };
        assert_eq!(u.initials(), "LG");
        let u = User { name: "  Ada ".into(), ..User::default() };
        assert_eq!(u.initials(), "A");
    }

    #[test]
    fn company_uses_camel_case_on_the_wire() {
        let c = Company { name: "Acme".into(), catch_phrase: "Go".into(), bs: "x".into() };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["catchPhrase"], "Go");
        assert!(v.get("catch_phrase").is_none());
    }

    #[test]
    fn validate_reports_first_blank_field() {
        let mut u = NewUser::from_form("Ada", "ada", "ada@x.io", "1", "ada.dev", "Acme");
        assert_eq!(u.validate(), Ok(()));
        u.email = "   ".into();
        assert_eq!(u.validate(), Err("email"));
        u.name.clear();
        assert_eq!(u.validate(), Err("name"));
    }

    #[test]
    fn user_decodes_with_missing_optional_parts() {
        let u: User = serde_json::from_str(r#"{"id": 11, "name": "Ada"}"#).unwrap();
        assert_eq!(u.id, 11);
        assert_eq!(u.company, Company::default());
    }
}

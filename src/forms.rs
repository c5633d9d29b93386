//! Submitted form bodies and their validation.
//!
//! Every form deserializes with missing fields as empty strings so that a
//! partial submission is reported field by field instead of being rejected
//! by the extractor.

use std::collections::BTreeMap;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::{NewRoom, NewUser, ProfileUpdate, RoomListing, User};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const PASSWORD_TOO_SHORT: &str =
    "This password is too short. It must contain at least 8 characters.";
pub const PASSWORD_NUMERIC: &str = "This password is entirely numeric.";

const USERNAME_MAX: usize = 150;
const NAME_MAX: usize = 150;
const EMAIL_MAX: usize = 254;
const ROOM_FIELD_MAX: usize = 200;
const PASSWORD_MIN: usize = 8;

/// Field name to the messages raised against it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn required(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, REQUIRED);
    } else if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

fn check_username(errors: &mut FormErrors, username: &str) {
    required(errors, "username", username, USERNAME_MAX);
    if !username.is_empty()
        && !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add("username", INVALID_USERNAME);
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::default();
        let username = self.username.trim().to_lowercase();

        check_username(&mut errors, &username);

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        } else {
            if self.password2.chars().count() < PASSWORD_MIN {
                errors.add("password2", PASSWORD_TOO_SHORT);
            }
            if self.password2.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password2", PASSWORD_NUMERIC);
            }
        }

        errors.finish(NewUser {
            username,
            password: self.password1.clone(),
        })
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomForm {
    pub topic: String,
    pub name: String,
    pub description: String,
}

impl RoomForm {
    pub fn validate(&self) -> Result<NewRoom, FormErrors> {
        let mut errors = FormErrors::default();
        let topic = self.topic.trim();
        let name = self.name.trim();

        required(&mut errors, "topic", topic, ROOM_FIELD_MAX);
        required(&mut errors, "name", name, ROOM_FIELD_MAX);

        errors.finish(NewRoom {
            topic: topic.to_owned(),
            name: name.to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

impl From<&RoomListing> for RoomForm {
    fn from(listing: &RoomListing) -> Self {
        Self {
            topic: listing.topic.name.clone(),
            name: listing.room.name.clone(),
            description: listing.room.description.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageForm {
    pub body: String,
}

impl MessageForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(FormErrors::single("body", REQUIRED));
        }

        Ok(body.to_owned())
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate, FormErrors> {
        let mut errors = FormErrors::default();
        let username = match self.username.trim() {
            "" => None,
            username => Some(username.to_lowercase()),
        };
        let email = self.email.trim();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();

        if let Some(username) = &username {
            check_username(&mut errors, username);
        }
        required(&mut errors, "first_name", first_name, NAME_MAX);
        required(&mut errors, "last_name", last_name, NAME_MAX);
        required(&mut errors, "email", email, EMAIL_MAX);
        if !email.is_empty() && !EmailAddress::is_valid(email) {
            errors.add("email", INVALID_EMAIL);
        }

        errors.finish(ProfileUpdate {
            username,
            email: email.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

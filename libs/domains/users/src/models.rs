use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier (UUIDv7)
    pub id: Uuid,
    #[schema(example = "a@b.com")]
    pub email: String,
    #[schema(example = "Mike")]
    pub given_name: String,
    #[schema(example = "Millers")]
    pub family_name: String,
    /// Creation time in milliseconds since the Unix epoch
    #[schema(example = 1700000000000_i64)]
    pub created: i64,
}

/// Creation payload
///
/// `created` is accepted only so a client-supplied value can be rejected.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email, length(min = 1))]
    #[schema(example = "a@b.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "Mike")]
    pub given_name: String,
    #[validate(length(min = 1))]
    #[schema(example = "Millers")]
    pub family_name: String,
    #[validate(custom(function = "must_be_empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl CreateUser {
    pub fn new(
        email: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            created: None,
        }
    }
}

// Only called by validator when the field is `Some`.
fn must_be_empty(_created: i64) -> Result<(), ValidationError> {
    let mut err = ValidationError::new("must_be_empty");
    err.message = Some("created must be empty".into());
    Err(err)
}

/// Partial update payload
///
/// Absent fields are left untouched; present fields must be non-empty.
/// Unknown keys such as `id` or `created` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

impl UpdateUser {
    /// True when the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.given_name.is_none() && self.family_name.is_none()
    }

    /// Merge the present fields into `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(given_name) = &self.given_name {
            user.given_name = given_name.clone();
        }
        if let Some(family_name) = &self.family_name {
            user.family_name = family_name.clone();
        }
    }
}

/// Validated record handed to the store; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub created: i64,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            email: self.email,
            given_name: self.given_name,
            family_name: self.family_name,
            created: self.created,
        }
    }
}

/// Result of a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(User),
    /// No record matched the id
    NotFound,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, Role, User};

pub const MAX_USER_NAME_LEN: usize = 256;
pub const MAX_EMAIL_LEN: usize = 256;

pub const PROFILE_UPDATE_FAILED: &str = "An error occurred while updating the profile.";

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerWithRoles {
    pub user: User,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderToDispatch {
    pub order: Order,
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProfile {
    pub user: User,
    pub roles: Vec<Role>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EditCustomerProfileForm {
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub user_name: String,
    pub email: String,
}

impl EditCustomerProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        validate_identity(&self.user_name, &self.email)
    }
}

pub fn validate_identity(user_name: &str, email: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if user_name.trim().is_empty() {
        errors.push("The UserName field is required.".to_string());
    } else if user_name.chars().count() > MAX_USER_NAME_LEN {
        errors.push(format!(
            "The UserName field must be at most {MAX_USER_NAME_LEN} characters."
        ));
    } else if user_name.chars().any(char::is_whitespace) {
        errors.push("The UserName field must not contain spaces.".to_string());
    }

    if email.trim().is_empty() {
        errors.push("The Email field is required.".to_string());
    } else if email.chars().count() > MAX_EMAIL_LEN {
        errors.push(format!(
            "The Email field must be at most {MAX_EMAIL_LEN} characters."
        ));
    } else if !is_valid_email(email) {
        errors.push("The Email field is not a valid e-mail address.".to_string());
    }

    errors
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug)]
pub enum ProfileUpdate {
    Saved(User),
    Rejected {
        form: EditCustomerProfileForm,
        errors: Vec<String>,
    },
}

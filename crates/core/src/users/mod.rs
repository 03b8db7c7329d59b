//! Users module - registration, credentials and profiles.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{
    normalize_email, ForgotPassword, LoginRequest, NewUser, PasswordChange, PasswordHasher,
    PasswordReset, User, UserProfile,
};
pub use users_service::UserService;
pub use users_traits::{Mailer, UserRepositoryTrait, UserServiceTrait};

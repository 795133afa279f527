//! Value Object Module

pub mod email;
pub mod full_name;
pub mod user_name;
pub mod user_password;

pub use email::Email;
pub use full_name::FullName;
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};

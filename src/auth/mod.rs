pub mod password;
pub mod services;

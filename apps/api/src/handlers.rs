pub mod authz;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

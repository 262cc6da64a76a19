//! User domain module
//!
//! Staff accounts of a merchant: the entity, its persistence port and the
//! usecase enforcing email uniqueness, role rules and photo uploads.

mod entity;
mod ports;
mod service;

pub use entity::{
    CreateUserParam, NewUser, UnknownRole, UpdateUserParam, UpdateUserPasswordParam, User,
    UserRole, UserUpdate,
};
pub use ports::UserRepository;
pub use service::UserUsecase;

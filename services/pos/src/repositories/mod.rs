//! Data access layer
//!
//! One repository per entity, each owning a clone of the connection pool.
//! Repositories separate data shape from storage operations; all uniqueness
//! and foreign-key checks the handlers need live here.

pub mod category;
pub mod product;
pub mod role;
pub mod user;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

pub mod models;

pub use models::{Follow, Post, User};

/// Authentication utilities
///
/// - `password`: Argon2id password hashing and verification
/// - `jwt`: HS256 access token creation and validation
/// - `middleware`: The authenticated identity context injected into requests

pub mod jwt;
pub mod middleware;
pub mod password;

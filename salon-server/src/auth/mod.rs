//! Authentication
//!
//! - [`JwtService`] - token issue / validation
//! - [`AdminAccount`] - the single back-office login
//! - [`require_auth`] - middleware guarding `/api/*`

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

/// Back-office credentials; the password is kept only as an Argon2 hash
#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    password_hash: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminAccount {
    pub const ROLE: &'static str = "admin";

    pub fn new(email: &str, password: &str) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            email: email.trim().to_lowercase(),
            password_hash: password::hash_password(password)?,
        })
    }

    /// Email comparison ignores case and surrounding whitespace
    pub fn verify(&self, email: &str, password: &str) -> bool {
        let email_matches = self.email == email.trim().to_lowercase();
        // always run the hash so both failure paths cost the same
        let password_matches = password::verify_password(password, &self.password_hash);
        email_matches && password_matches
    }
}

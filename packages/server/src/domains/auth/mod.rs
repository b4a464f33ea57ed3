//! Auth domain - session token verification
//!
//! Identity issuance (signup, login, token minting) lives in the portal's
//! identity provider; this domain only verifies bearer tokens and exposes the
//! claims the rest of the pipeline needs (resident id, verified email).

pub mod jwt;

pub use jwt::{Claims, JwtService};

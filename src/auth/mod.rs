mod claims;
pub mod extractors;
pub mod jwt;

pub use claims::Claims;
pub use extractors::AuthUser;

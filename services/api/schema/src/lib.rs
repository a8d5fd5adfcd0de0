//! sea-orm entities for the wordwell database.

pub mod users;
pub mod verification_codes;

mod admin;

pub use admin::{Admin, AdminSessionRecord, CurrentAdmin};

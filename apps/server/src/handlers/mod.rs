pub(crate) mod admin;
pub(crate) mod capture;
pub(crate) mod drops;
pub(crate) mod health;

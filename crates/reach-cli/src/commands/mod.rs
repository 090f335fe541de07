pub(crate) mod admin;
pub(crate) mod helpers;
pub(crate) mod inspect;

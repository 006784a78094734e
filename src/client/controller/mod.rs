pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod board;
pub(crate) mod control;
pub(crate) mod error;
pub(crate) mod merchant;
pub(crate) mod rules;
pub(crate) mod segmentation;
pub(crate) mod settlement;
pub(crate) mod storefront;

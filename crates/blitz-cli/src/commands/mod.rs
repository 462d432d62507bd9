pub mod demo;
pub mod edit;
pub mod pages;
pub mod persist;
pub mod show;
pub mod templates;

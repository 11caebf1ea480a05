pub mod catalog;
pub mod config;
pub mod coords;
pub mod dashboard;
pub mod error;
pub mod gallery;
pub mod image_view;
pub mod locator;
pub mod navigation;
pub mod search;
pub mod session;
pub mod widget;

#[cfg(test)]
mod tests;

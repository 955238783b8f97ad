pub mod driver;
pub mod view;

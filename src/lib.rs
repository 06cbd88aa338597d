pub mod backend;
pub mod config;
pub mod controller;
pub mod mode;
pub mod plans;
pub mod pointer;
pub mod profile;
pub mod resolver;
pub mod storage;
pub mod types;

#[cfg(any(feature = "web", feature = "desktop", feature = "mobile"))]
pub mod ui;
#[cfg(any(feature = "web", feature = "desktop", feature = "mobile"))]
pub mod views;

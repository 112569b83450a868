extern crate flate2;
extern crate rayon;
#[macro_use]
extern crate serde_derive;

pub mod configuration;
pub mod data;
pub mod defs;
pub mod error;
pub mod output;
pub mod render;
pub mod site;
pub mod viewmodel;

pub use crate::error::{Error, Result};

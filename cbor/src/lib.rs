#![no_std]
extern crate alloc;

pub mod config;
pub mod decode;
pub mod diff;
pub mod error;
pub mod print;


#[cfg(test)]
mod print_tests;

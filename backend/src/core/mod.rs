//! Time management: virtual clock and continuation scheduling

pub mod time;

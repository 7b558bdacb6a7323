mod people;
pub use people::*;

mod exercise;
pub use exercise::*;

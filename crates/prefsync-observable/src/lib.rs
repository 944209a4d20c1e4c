#![doc = include_str!("../README.md")]

mod observable;
mod subscription;

pub use observable::Observable;
pub use subscription::Subscription;

//! Data models for board rows.

mod access_log;
mod account;
mod api_key;
mod device;
mod keyed;
mod media;
mod notice;

pub use access_log::*;
pub use account::*;
pub use api_key::*;
pub use device::*;
pub use keyed::*;
pub use media::*;
pub use notice::*;

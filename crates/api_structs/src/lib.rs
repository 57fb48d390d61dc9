mod note;
mod push_subscription;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::note::dtos::*;
    pub use crate::push_subscription::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::note::api::*;
pub use crate::push_subscription::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;

//! Domain types and models

pub mod envelope;
pub mod method;
pub mod params;
pub mod resources;

pub use envelope::ResponseEnvelope;
pub use method::HttpMethod;
pub use params::RequestParams;
pub use resources::{Admin, Group, NewUser, Phone, User, UserStatus};

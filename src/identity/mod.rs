//! Identity provider client layer.
//!
//! Authentication is delegated wholesale to an external identity provider;
//! this crate consumes four operations (sign up, sign in, get current user,
//! sign out) and implements none of the protocol itself. The provider's
//! error text is relayed to the caller verbatim.

mod http_provider;
mod provider;

pub use http_provider::HttpIdentityProvider;
pub use provider::{Credentials, IdentityProvider, Session, UserInfo};

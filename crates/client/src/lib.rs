//! Client-side session state for the bedwatch API.
//!
//! - [`favorites::FavoritesStore`] keeps the user's favorite wards in sync
//!   with the server using optimistic updates and per-ward rollback.
//! - [`search::WardSearch`] debounces ward searches and drops responses that
//!   arrive after a newer one was applied.
//! - [`remote::HttpRemote`] speaks the REST API over `reqwest`.

pub mod favorites;
pub mod notify;
pub mod remote;
pub mod search;

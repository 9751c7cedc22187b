//! Addresses feature slice: postal addresses with coordinates, CRUD storage
//! and a radius-based proximity search.
//!
//! The slice owns the `address` table and the `address_id` sequence. Register its
//! [`migrations`] with the database builder, then [`init`] it:
//!
//! ```rust,no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use geopost_database::Database;
//!
//! let db = Database::builder()
//!     .url("mem://")
//!     .session("geopost", "core")
//!     .migrations(geopost_addresses::migrations())
//!     .init()
//!     .await?;
//! let slice = geopost_addresses::init(&db)?;
//! # Ok(())
//! # }
//! ```

mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod model;
pub mod proximity;
mod repository;
#[cfg(feature = "server")]
mod router;
pub mod validation;

pub use error::{AddressError, AddressErrorExt};
pub use model::{Address, AddressInput, ListParams, ProximityParams};
pub use repository::AddressRepository;
#[cfg(feature = "server")]
pub use router::router;
pub use validation::{ValidAddress, validate};

use geopost_database::{Database, Migration};
use geopost_kernel::domain::registry::InitializedSlice;

/// Slice key used for migration bookkeeping.
pub const SLICE: &str = "addresses";

const MIGRATIONS: &[Migration] =
    &[Migration::new(SLICE, "0001", include_str!("../migrations/0001_address.surql"))];

/// Addresses feature state
#[geopost_derive::geopost_slice]
pub struct Addresses {
    pub repository: AddressRepository,
}

/// Schema migrations owned by this slice, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    MIGRATIONS.to_vec()
}

/// Initialize the addresses feature on an already migrated database.
///
/// # Errors
/// Currently infallible; kept fallible like every slice initializer.
pub fn init(db: &Database) -> Result<InitializedSlice, AddressError> {
    tracing::info!("Addresses slice initialized");

    let inner = AddressesInner { repository: AddressRepository::new(db.clone()) };

    Ok(InitializedSlice::new(Addresses::new(inner)))
}

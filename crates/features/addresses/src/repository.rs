use crate::error::AddressError;
use crate::model::Address;
use crate::validation::ValidAddress;
use geopost_database::{Database, DatabaseErrorExt, retry_on_conflict};
use geopost_kernel::problem::FieldViolation;
use tracing::instrument;

const PROJECTION: &str =
    "id.id() AS id, street, city, state, country, postal_code, latitude, longitude";

/// Durable keyed storage of addresses.
///
/// Every call acquires its own database session and releases it on return.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    db: Database,
}

impl AddressRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores a new address under a freshly allocated identifier.
    ///
    /// Identifiers come from the `address_id` sequence, so concurrent creates
    /// never contend on a shared counter row.
    ///
    /// # Errors
    /// [`AddressError::Database`] if allocation or the insert fails.
    #[instrument(skip_all)]
    pub async fn create(&self, fields: ValidAddress) -> Result<Address, AddressError> {
        let id = retry_on_conflict(|| async move {
            self.db
                .session()
                .query("RETURN sequence::nextval('address_id')")
                .await
                .context("Allocating address id")?
                .take::<Option<i64>>(0)
                .context("Reading allocated address id")
        })
        .await?
        .ok_or_else(|| AddressError::Internal {
            message: "Sequence returned no value".into(),
            context: Some("Allocating address id".into()),
        })?;

        let query = format!("SELECT {PROJECTION} FROM (CREATE address:{id} CONTENT $fields)");
        self.write(&query, Some(&fields), "Creating address")
            .await?
            .ok_or_else(|| AddressError::Internal {
                message: format!("Address {id} missing after insert").into(),
                context: None,
            })
    }

    /// # Errors
    /// [`AddressError::NotFound`] if no address has this identifier.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Address, AddressError> {
        self.find(id).await?.ok_or_else(|| AddressError::not_found(id))
    }

    /// Up to `limit` addresses after skipping `skip`, in identifier order.
    ///
    /// # Errors
    /// [`AddressError::Validation`] if `skip` or `limit` is negative.
    #[instrument(skip(self))]
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Address>, AddressError> {
        let violations: Vec<_> = [("skip", skip), ("limit", limit)]
            .into_iter()
            .filter(|(_, value)| *value < 0)
            .map(|(field, _)| FieldViolation::new(field, "must be greater than or equal to 0"))
            .collect();
        if !violations.is_empty() {
            return Err(AddressError::Validation { violations, context: None });
        }

        let query = format!("SELECT {PROJECTION} FROM address ORDER BY id LIMIT $limit START $skip");
        let addresses = self
            .db
            .session()
            .query(&query)
            .bind(("limit", limit))
            .bind(("skip", skip))
            .await
            .context("Listing addresses")?
            .take::<Vec<Address>>(0)
            .context("Reading address page")?;

        Ok(addresses)
    }

    /// The whole collection in identifier order.
    ///
    /// # Errors
    /// [`AddressError::Database`] if the scan fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Address>, AddressError> {
        let query = format!("SELECT {PROJECTION} FROM address ORDER BY id");
        let addresses = self
            .db
            .session()
            .query(&query)
            .await
            .context("Scanning addresses")?
            .take::<Vec<Address>>(0)
            .context("Reading addresses")?;

        Ok(addresses)
    }

    /// Replaces every field except the identifier.
    ///
    /// # Errors
    /// [`AddressError::NotFound`] if no address has this identifier.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: i64, fields: ValidAddress) -> Result<Address, AddressError> {
        if id < 1 {
            return Err(AddressError::not_found(id));
        }

        let query = format!(
            "SELECT {PROJECTION} FROM (UPDATE address:{id} CONTENT $fields RETURN AFTER)"
        );
        self.write(&query, Some(&fields), "Updating address")
            .await?
            .ok_or_else(|| AddressError::not_found(id))
    }

    /// Removes an address and returns it as it was.
    ///
    /// Of two concurrent deletes of the same record exactly one succeeds.
    ///
    /// # Errors
    /// [`AddressError::NotFound`] if no address has this identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Address, AddressError> {
        if id < 1 {
            return Err(AddressError::not_found(id));
        }

        let query = format!("SELECT {PROJECTION} FROM (DELETE address:{id} RETURN BEFORE)");
        self.write(&query, None, "Deleting address").await?.ok_or_else(|| AddressError::not_found(id))
    }

    /// Runs one write statement, replaying it on conflict, and returns the
    /// record it touched.
    async fn write(
        &self,
        query: &str,
        fields: Option<&ValidAddress>,
        action: &'static str,
    ) -> Result<Option<Address>, AddressError> {
        let touched = retry_on_conflict(|| async move {
            let session = self.db.session();
            let mut request = session.query(query);
            if let Some(fields) = fields {
                request = request.bind(("fields", fields.clone()));
            }
            request.await.context(action)?.take::<Vec<Address>>(0).context(action)
        })
        .await?;

        Ok(touched.into_iter().next())
    }

    async fn find(&self, id: i64) -> Result<Option<Address>, AddressError> {
        if id < 1 {
            return Ok(None);
        }

        let query = format!("SELECT {PROJECTION} FROM ONLY address:{id}");
        let address = self
            .db
            .session()
            .query(&query)
            .await
            .context("Fetching address")?
            .take::<Option<Address>>(0)
            .context("Reading address")?;

        Ok(address)
    }
}

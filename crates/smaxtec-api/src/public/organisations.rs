use std::sync::LazyLock;

use serde_json::Value;

use super::PublicApi;
use crate::error::Error;
use crate::memo::Memoize;
use crate::params::Params;

/// Organisation timezones, keyed by `(client id, organisation_id)`.
static TIMEZONES: LazyLock<Memoize<(u64, String), Option<String>>> =
    LazyLock::new(Memoize::new);

impl PublicApi {
    pub async fn organisation(&self, organisation_id: &str) -> Result<Value, Error> {
        self.get_with(
            "/organisation/by_id",
            Params::new().with("organisation_id", organisation_id),
        )
        .await
    }

    /// IDs of all animals in an organisation.
    pub async fn organisation_animal_ids(
        &self,
        organisation_id: &str,
    ) -> Result<Vec<String>, Error> {
        let animals = self
            .get_with(
                "/animal/ids_by_organisation",
                Params::new().with("organisation_id", organisation_id),
            )
            .await?;

        let entries = animals.as_array().ok_or_else(|| Error::Deserialization {
            message: "animal id list is not an array".into(),
            body: animals.to_string(),
        })?;
        entries
            .iter()
            .map(|entry| {
                entry
                    .get("_id")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| Error::Deserialization {
                        message: "animal entry without _id".into(),
                        body: entry.to_string(),
                    })
            })
            .collect()
    }

    pub async fn animal(&self, animal_id: &str) -> Result<Value, Error> {
        self.get_with("/animal/by_id", Params::new().with("animal_id", animal_id))
            .await
    }

    pub async fn device(&self, device_id: &str) -> Result<Value, Error> {
        self.get_with("/device/by_id", Params::new().with("device_id", device_id))
            .await
    }

    /// The organisation's `timezone`, cached per client for the life of the
    /// process. A missing timezone is cached as `None` too.
    pub async fn timezone_for_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<Option<String>, Error> {
        let key = (self.client().id(), organisation_id.to_owned());
        TIMEZONES
            .get_or_try_insert_with(key, || async {
                let organisation = self.organisation(organisation_id).await?;
                Ok::<_, Error>(
                    organisation
                        .get("timezone")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                )
            })
            .await
    }
}

use serde_json::Value;

use super::{InternApi, v1};
use crate::error::Error;
use crate::params::Params;

impl InternApi {
    pub async fn animal(&self, animal_id: &str) -> Result<Value, Error> {
        self.get_query("/animal", Params::new().with("animal_id", animal_id))
            .await
    }

    pub async fn last_unconfirmed_lactation_date(
        &self,
        lactation_id: &str,
    ) -> Result<Value, Error> {
        self.client()
            .get(
                "/animal/lactation_history_confirmed",
                v1().query(Params::new().with("lactation_id", lactation_id)),
            )
            .await
    }

    pub async fn move_animal(&self, animal_id: &str, organisation_id: &str) -> Result<Value, Error> {
        let body = Params::new()
            .with("animal_id", animal_id)
            .with("organisation_id", organisation_id);
        self.client()
            .post("/organisation/move_animal", v1().json(body))
            .await
    }
}

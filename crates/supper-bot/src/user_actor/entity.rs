//! [`ActorEntity`] implementation for [`CustomerProfile`].

use super::UserError;
use crate::model::CustomerProfile;
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for CustomerProfile {
    type Id = i64;
    type Create = CustomerProfile;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = UserError;

    fn id(&self) -> i64 {
        self.user_id
    }

    fn from_create_params(params: CustomerProfile) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(UserError::ValidationError(format!(
                "profile {} has no name",
                params.user_id
            )));
        }
        Ok(params)
    }

    /// Profiles are replaced wholesale through upsert.
    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

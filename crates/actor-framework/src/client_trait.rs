//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: default `get`, `list` and
//! `delete` built on top of a generic `ResourceClient`, with framework errors
//! mapped into the resource's own error type.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read/delete operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Profile { user_id: i64 }
/// #[derive(Debug)] struct ProfileCreate { user_id: i64 }
/// #[derive(Debug)] struct ProfileUpdate;
/// #[derive(Debug)] enum ProfileAction {}
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct ProfileError(String);
///
/// impl From<String> for ProfileError {
///     fn from(s: String) -> Self { ProfileError(s) }
/// }
///
/// #[async_trait]
/// impl ActorEntity for Profile {
///     type Id = i64;
///     type Create = ProfileCreate;
///     type Update = ProfileUpdate;
///     type Action = ProfileAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = ProfileError;
///
///     fn id(&self) -> i64 { self.user_id }
///     fn from_create_params(p: ProfileCreate) -> Result<Self, Self::Error> {
///         Ok(Self { user_id: p.user_id })
///     }
///     async fn on_update(&mut self, _: ProfileUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: ProfileAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct ProfileClient {
///     inner: ResourceClient<Profile>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Profile> for ProfileClient {
///     type Error = ProfileError;
///
///     fn inner(&self) -> &ResourceClient<Profile> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         ProfileError(e.to_string())
///     }
/// }
///
/// async fn usage(client: ProfileClient) {
///     // get(), list() and delete() come for free
///     let _ = client.get(42).await;
///     let _ = client.list().await;
///     let _ = client.delete(42).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every stored entity, in no particular order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

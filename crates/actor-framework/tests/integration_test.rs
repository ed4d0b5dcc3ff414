use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Slot {
    id: String,
    capacity: u32,
    taken: u32,
}

#[derive(Debug)]
struct SlotCreate {
    id: String,
    capacity: u32,
}

#[derive(Debug)]
struct SlotUpdate {
    capacity: Option<u32>,
}

#[derive(Debug)]
enum SlotAction {
    Reserve(u32),
}

#[derive(Debug, thiserror::Error)]
enum SlotError {
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("slot full")]
    Full,
}

#[async_trait]
impl ActorEntity for Slot {
    type Id = String;
    type Create = SlotCreate;
    type Update = SlotUpdate;
    type Action = SlotAction;
    type ActionResult = u32;
    type Context = ();
    type Error = SlotError;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn from_create_params(params: SlotCreate) -> Result<Self, Self::Error> {
        if params.capacity == 0 {
            return Err(SlotError::ZeroCapacity);
        }
        Ok(Self {
            id: params.id,
            capacity: params.capacity,
            taken: 0,
        })
    }

    async fn on_update(&mut self, update: SlotUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: SlotAction, _ctx: &()) -> Result<u32, Self::Error> {
        match action {
            SlotAction::Reserve(n) => {
                if self.taken + n > self.capacity {
                    return Err(SlotError::Full);
                }
                self.taken += n;
                Ok(self.capacity - self.taken)
            }
        }
    }
}

fn slot(id: &str, capacity: u32) -> SlotCreate {
    SlotCreate {
        id: id.to_string(),
        capacity,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::new(10);
    let handle = tokio::spawn(actor.run(()));

    // 1. Create keeps the entity's own id
    let id: String = client.create(slot("tue-1900", 4)).await.unwrap();
    assert_eq!(id, "tue-1900");

    // 2. Action
    let left = client
        .perform_action(id.clone(), SlotAction::Reserve(3))
        .await
        .unwrap();
    assert_eq!(left, 1);
    let full = client.perform_action(id.clone(), SlotAction::Reserve(2)).await;
    assert!(matches!(full, Err(FrameworkError::EntityError(_))));

    // 3. Update
    let updated: Slot = client
        .update(id.clone(), SlotUpdate { capacity: Some(10) })
        .await
        .unwrap();
    assert_eq!(updated.capacity, 10);
    assert_eq!(updated.taken, 3);

    // 4. Delete
    client.delete(id.clone()).await.unwrap();
    assert!(client.get(id.clone()).await.unwrap().is_none());
    assert!(matches!(
        client.delete(id).await,
        Err(FrameworkError::NotFound(_))
    ));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_create_rejects_duplicate_but_upsert_replaces() {
    let (actor, client) = ResourceActor::<Slot>::new(10);
    tokio::spawn(actor.run(()));

    client.create(slot("wed-2000", 2)).await.unwrap();
    client
        .perform_action("wed-2000".to_string(), SlotAction::Reserve(1))
        .await
        .unwrap();

    let dup = client.create(slot("wed-2000", 8)).await;
    assert!(matches!(dup, Err(FrameworkError::AlreadyExists(id)) if id == "wed-2000"));

    client.upsert(slot("wed-2000", 8)).await.unwrap();
    let stored = client.get("wed-2000".to_string()).await.unwrap().unwrap();
    assert_eq!(stored.capacity, 8);
    assert_eq!(stored.taken, 0);
}

#[tokio::test]
async fn test_list_and_invalid_create() {
    let (actor, client) = ResourceActor::<Slot>::new(10);
    tokio::spawn(actor.run(()));

    assert!(client.list().await.unwrap().is_empty());
    assert!(matches!(
        client.create(slot("bad", 0)).await,
        Err(FrameworkError::EntityError(_))
    ));

    client.create(slot("a", 1)).await.unwrap();
    client.create(slot("b", 1)).await.unwrap();
    let mut ids: Vec<String> = client.list().await.unwrap().into_iter().map(|s| s.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}

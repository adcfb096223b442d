use roomcast::prelude::*;

// ---------------------------------------------------------------------------
// Demo: two students chatting in a course room and a direct-message room,
// both nodes attached to one in-process network.
//
//   RUST_LOG=roomcast=debug cargo run -p course-chat
// ---------------------------------------------------------------------------

struct Student {
    id: &'static str,
    name: &'static str,
    messenger: Messenger<MemoryTransport>,
    events: EventReceiver,
}

impl Student {
    async fn connect(
        network: &MemoryNetwork,
        id: &'static str,
        name: &'static str,
    ) -> Result<Self, RoomcastError> {
        let messenger = RoomcastBuilder::new()
            .build(network.node_with_identity(format!("node-{id}")))
            .await?;
        let events = messenger.events();
        Ok(Self { id, name, messenger, events })
    }

    async fn join(&self, room: &RoomId) -> Result<(), RoomcastError> {
        self.messenger.join_room(room, self.id).await?;
        Ok(())
    }

    async fn say(&self, room: &RoomId, text: &str) -> Result<(), RoomcastError> {
        self.messenger.send_message(room, self.id, self.name, text).await?;
        Ok(())
    }

    fn print_inbox(&mut self) {
        while let Ok(MessengerEvent::Message { room_id, message }) = self.events.try_recv() {
            println!(
                "  {:<6} <- [{room_id}] {} ({}): {}",
                self.name,
                message.sender_name,
                message.timestamp.format("%H:%M:%S%.3f"),
                message.content
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), RoomcastError> {
    init_tracing("info")?;

    let network = MemoryNetwork::new();
    let mut alice = Student::connect(&network, "u1", "Alice").await?;
    let mut bob = Student::connect(&network, "u2", "Bob").await?;

    let course = RoomId::course(101);
    alice.join(&course).await?;
    bob.join(&course).await?;

    alice.say(&course, "hello").await?;
    bob.say(&course, "hi Alice, did you finish the lab?").await?;

    // Each side names the DM room from its own point of view.
    let dm_from_alice = RoomId::direct(alice.id, bob.id);
    let dm_from_bob = RoomId::direct(bob.id, alice.id);
    alice.join(&dm_from_alice).await?;
    bob.join(&dm_from_bob).await?;
    alice.say(&dm_from_alice, "almost, want to compare notes?").await?;

    println!("inboxes:");
    alice.print_inbox();
    bob.print_inbox();

    let peers = alice.messenger.list_peers(&course).await;
    tracing::info!(room = %course, peers = ?peers, "peers seen by Alice");

    // Sending to a room nobody joined is refused, not dropped.
    if let Err(e) = bob.say(&RoomId::course(999), "anyone?").await {
        tracing::warn!(error = %e, "send refused");
    }

    alice.messenger.shutdown().await;
    bob.messenger.shutdown().await;
    Ok(())
}

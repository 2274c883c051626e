//! ChatServer Actor implementation
//!
//! The central actor that serializes all access to the room registry and
//! connected clients. Uses the Actor pattern with mpsc channels for message
//! passing; the core room logic stays synchronous inside each command.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::chat::DeliveryPlan;
use crate::client::Client;
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::registry::RoomRegistry;
use crate::rng::ThreadRngPicker;
use crate::types::{ClientId, RoomCode};

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect {
        client_id: ClientId,
    },
    /// Create a new room and join it
    Create {
        client_id: ClientId,
    },
    /// Join an existing room
    Join {
        client_id: ClientId,
        room_id: String,
    },
    /// Send a chat message to the current room
    Chat {
        client_id: ClientId,
        content: String,
    },
    /// Leave the current room
    Leave {
        client_id: ClientId,
    },
}

/// The main ChatServer actor
///
/// Owns the room registry and all client channels; processes commands one
/// at a time, so room operations run to completion without locks.
pub struct ChatServer {
    /// All connected clients: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    /// All active rooms
    registry: RoomRegistry,
    /// Client to room mapping for fast lookup: ClientId -> RoomCode
    client_rooms: HashMap<ClientId, RoomCode>,
    /// Randomness for room codes and nickname selection
    rng: ThreadRngPicker,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            clients: HashMap::new(),
            registry: RoomRegistry::new(),
            client_rooms: HashMap::new(),
            rng: ThreadRngPicker,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::Create { client_id } => {
                self.handle_create(client_id).await;
            }
            ServerCommand::Join { client_id, room_id } => {
                self.handle_join(client_id, room_id).await;
            }
            ServerCommand::Chat { client_id, content } => {
                self.handle_chat(client_id, content).await;
            }
            ServerCommand::Leave { client_id } => {
                self.handle_leave(client_id).await;
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        info!("Client {} connected", client_id);
        let client = Client::new(client_id, sender);
        self.clients.insert(client_id, client);
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.registry.len()
        );
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        // Remove from room if in one
        if let Some(room_code) = self.client_rooms.remove(&client_id) {
            self.remove_client_from_room(client_id, &room_code);
        }

        // Remove client
        self.clients.remove(&client_id);

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.registry.len()
        );
    }

    /// Handle room creation: the creator joins the new room immediately
    async fn handle_create(&mut self, client_id: ClientId) {
        let Some(client) = self.clients.get(&client_id) else {
            return;
        };

        // Check if already in a room
        if self.client_rooms.contains_key(&client_id) {
            let _ = client.send(AppError::AlreadyInRoom.into()).await;
            return;
        }

        let room_code = self.registry.create_room(&mut self.rng);
        let Some(room) = self.registry.get_room_mut(&room_code) else {
            return;
        };
        let user_name = room.add_member(client_id, &mut self.rng);
        self.client_rooms.insert(client_id, room_code.clone());

        info!("Client {} created room {} as '{}'", client_id, room_code, user_name);

        if let Some(client) = self.clients.get(&client_id) {
            let _ = client
                .send(ServerMessage::Created {
                    room_id: room_code.to_string(),
                    user_name,
                })
                .await;
        }
    }

    /// Handle room joining
    async fn handle_join(&mut self, client_id: ClientId, room_id: String) {
        let Some(client) = self.clients.get(&client_id) else {
            return;
        };

        // Check if already in a room
        if self.client_rooms.contains_key(&client_id) {
            let _ = client.send(AppError::AlreadyInRoom.into()).await;
            return;
        }

        let room_code = RoomCode::from_string(room_id);

        // Check room exists
        let Some(room) = self.registry.get_room_mut(&room_code) else {
            let _ = client
                .send(AppError::RoomNotFound(room_code.to_string()).into())
                .await;
            return;
        };

        let user_name = room.add_member(client_id, &mut self.rng);
        let history: Vec<_> = room.history().iter().cloned().collect();
        self.client_rooms.insert(client_id, room_code.clone());

        info!("Client {} joined room {} as '{}'", client_id, room_code, user_name);

        let Some(client) = self.clients.get(&client_id) else {
            return;
        };

        // One-time history payload before the join confirmation
        if !history.is_empty() {
            let _ = client.send(ServerMessage::History { messages: history }).await;
        }

        let _ = client
            .send(ServerMessage::Joined {
                room_id: room_code.to_string(),
                user_name,
            })
            .await;
    }

    /// Handle chat message: append to the room log and fan out the plans
    async fn handle_chat(&mut self, client_id: ClientId, content: String) {
        // Check if in a room
        let Some(room_code) = self.client_rooms.get(&client_id) else {
            if let Some(client) = self.clients.get(&client_id) {
                let _ = client.send(AppError::NotInRoom.into()).await;
            }
            return;
        };

        let Some(room) = self.registry.get_room_mut(room_code) else {
            return;
        };

        let plans = room.post_message(client_id, content, Utc::now());
        self.deliver(plans).await;
    }

    /// Handle voluntary room leaving
    async fn handle_leave(&mut self, client_id: ClientId) {
        let Some(room_code) = self.client_rooms.remove(&client_id) else {
            if let Some(client) = self.clients.get(&client_id) {
                let _ = client.send(AppError::NotInRoom.into()).await;
            }
            return;
        };

        info!("Client {} left room {}", client_id, room_code);

        self.remove_client_from_room(client_id, &room_code);
    }

    /// Fan delivery plans out to the recipients' channels
    async fn deliver(&self, plans: Vec<DeliveryPlan>) {
        for plan in plans {
            for recipient in &plan.recipients {
                if let Some(client) = self.clients.get(recipient) {
                    let _ = client
                        .send(ServerMessage::Message(plan.message.clone()))
                        .await;
                }
            }
        }
    }

    /// Helper: remove a client from a room, deleting the room once empty
    fn remove_client_from_room(&mut self, client_id: ClientId, room_code: &RoomCode) {
        let Some(room) = self.registry.get_room_mut(room_code) else {
            return;
        };

        room.remove_member(client_id);

        if room.is_empty() {
            self.registry.remove_room(room_code);
            debug!("Room {} deleted (empty)", room_code);
        }
    }
}

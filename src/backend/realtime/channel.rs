/**
 * Project Room Table
 *
 * `EventChannel` tracks which socket connections are joined to which project
 * rooms and pushes `ServerEvent`s into each connection's outbound queue.
 *
 * # Delivery
 *
 * - Every connection owns an unbounded `mpsc` queue; the socket task drains it.
 * - Events are pushed while the table lock is held, so two events emitted one
 *   after another reach every member of a room in the same order.
 * - Delivery is at-most-once. A queue whose receiver is gone is skipped.
 *
 * # Locking
 *
 * The table sits behind a `std::sync::Mutex`. It is only held for map
 * bookkeeping and non-blocking queue pushes, never across an `.await`.
 */
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Identifier of one socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

struct ConnectionEntry {
    user_id: Uuid,
    outbound: mpsc::UnboundedSender<ServerEvent>,
    rooms: HashSet<Uuid>,
}

#[derive(Default)]
struct RoomTable {
    next_id: u64,
    rooms: HashMap<Uuid, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

impl RoomTable {
    /// Push to every member of `room` except `skip`
    fn fan_out(&self, room: Uuid, skip: Option<ConnectionId>, event: &ServerEvent) -> usize {
        let Some(members) = self.rooms.get(&room) else {
            return 0;
        };

        let mut delivered = 0;
        for conn in members {
            if Some(*conn) == skip {
                continue;
            }
            let Some(entry) = self.connections.get(conn) else {
                continue;
            };
            match entry.outbound.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::debug!("[Realtime] {} queue closed, skipping", conn),
            }
        }
        delivered
    }
}

/// Room-based fan-out of project events
#[derive(Clone, Default)]
pub struct EventChannel {
    table: Arc<Mutex<RoomTable>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RoomTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a connection and hand back the receiving end of its queue
    pub fn connect(&self, user_id: Uuid) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (outbound, inbound) = mpsc::unbounded_channel();
        let mut table = self.lock();
        table.next_id += 1;
        let id = ConnectionId(table.next_id);
        table.connections.insert(
            id,
            ConnectionEntry {
                user_id,
                outbound,
                rooms: HashSet::new(),
            },
        );
        tracing::debug!("[Realtime] {} connected for user {}", id, user_id);
        (id, inbound)
    }

    /// Add a connection to a room; returns `false` if it was already there
    /// or is not registered
    pub fn join(&self, room: Uuid, conn: ConnectionId) -> bool {
        let mut table = self.lock();
        let Some(entry) = table.connections.get_mut(&conn) else {
            return false;
        };
        if !entry.rooms.insert(room) {
            return false;
        }
        table.rooms.entry(room).or_default().insert(conn);
        true
    }

    /// Remove a connection from a room; empty rooms are dropped
    pub fn leave(&self, room: Uuid, conn: ConnectionId) -> bool {
        let mut table = self.lock();
        let removed = table
            .connections
            .get_mut(&conn)
            .is_some_and(|entry| entry.rooms.remove(&room));
        if removed {
            if let Some(members) = table.rooms.get_mut(&room) {
                members.remove(&conn);
                if members.is_empty() {
                    table.rooms.remove(&room);
                }
            }
        }
        removed
    }

    /// Deliver an event to every connection in the room
    ///
    /// # Returns
    ///
    /// Number of connections the event was queued for
    pub fn broadcast(&self, room: Uuid, event: ServerEvent) -> usize {
        let delivered = self.lock().fan_out(room, None, &event);
        tracing::debug!(
            "[Realtime] {} broadcast to {} connections in {}",
            event.name(),
            delivered,
            room
        );
        delivered
    }

    /// Deliver an event to every connection in the room except `sender`
    pub fn broadcast_except_sender(&self, room: Uuid, sender: ConnectionId, event: ServerEvent) -> usize {
        self.lock().fan_out(room, Some(sender), &event)
    }

    /// Forget a connection and remove it from every room it joined
    ///
    /// # Returns
    ///
    /// Number of rooms the connection was removed from
    pub fn disconnect(&self, conn: ConnectionId) -> usize {
        let mut table = self.lock();
        let Some(entry) = table.connections.remove(&conn) else {
            return 0;
        };
        for room in &entry.rooms {
            if let Some(members) = table.rooms.get_mut(room) {
                members.remove(&conn);
                if members.is_empty() {
                    table.rooms.remove(room);
                }
            }
        }
        tracing::debug!(
            "[Realtime] {} for user {} disconnected from {} rooms",
            conn,
            entry.user_id,
            entry.rooms.len()
        );
        entry.rooms.len()
    }

    pub fn is_member(&self, room: Uuid, conn: ConnectionId) -> bool {
        self.lock()
            .rooms
            .get(&room)
            .is_some_and(|members| members.contains(&conn))
    }

    pub fn room_size(&self, room: Uuid) -> usize {
        self.lock().rooms.get(&room).map_or(0, HashSet::len)
    }

    pub fn room_count(&self) -> usize {
        self.lock().rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.lock().connections.len()
    }

    /// Rooms a connection has joined
    pub fn rooms_of(&self, conn: ConnectionId) -> Vec<Uuid> {
        self.lock()
            .connections
            .get(&conn)
            .map(|entry| entry.rooms.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::TypingIndicator;

    fn typing(name: &str) -> ServerEvent {
        ServerEvent::UserTyping(TypingIndicator {
            username: name.to_string(),
            task_id: None,
        })
    }

    #[test]
    fn test_join_is_idempotent() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (conn, _rx) = channel.connect(Uuid::new_v4());

        assert!(channel.join(room, conn));
        assert!(!channel.join(room, conn));
        assert_eq!(channel.room_size(room), 1);
    }

    #[test]
    fn test_leave_drops_empty_room() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (conn, _rx) = channel.connect(Uuid::new_v4());

        channel.join(room, conn);
        assert_eq!(channel.room_count(), 1);
        assert!(channel.leave(room, conn));
        assert!(!channel.leave(room, conn));
        assert_eq!(channel.room_count(), 0);
    }

    #[test]
    fn test_broadcast_reaches_only_joined() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (a, mut rx_a) = channel.connect(Uuid::new_v4());
        let (b, mut rx_b) = channel.connect(Uuid::new_v4());
        let (_c, mut rx_c) = channel.connect(Uuid::new_v4());
        channel.join(room, a);
        channel.join(room, b);

        let id = Uuid::new_v4();
        assert_eq!(channel.broadcast(room, ServerEvent::TaskDeleted(id)), 2);

        assert_eq!(rx_a.try_recv().unwrap(), ServerEvent::TaskDeleted(id));
        assert_eq!(rx_b.try_recv().unwrap(), ServerEvent::TaskDeleted(id));
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_except_sender_skips_sender() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (a, mut rx_a) = channel.connect(Uuid::new_v4());
        let (b, mut rx_b) = channel.connect(Uuid::new_v4());
        channel.join(room, a);
        channel.join(room, b);

        assert_eq!(channel.broadcast_except_sender(room, a, typing("alice")), 1);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), typing("alice"));
    }

    #[test]
    fn test_disconnect_removes_from_all_rooms() {
        let channel = EventChannel::new();
        let (conn, _rx) = channel.connect(Uuid::new_v4());
        let rooms = [Uuid::new_v4(), Uuid::new_v4()];
        for room in rooms {
            channel.join(room, conn);
        }
        assert_eq!(channel.rooms_of(conn).len(), 2);

        assert_eq!(channel.disconnect(conn), 2);
        assert_eq!(channel.room_count(), 0);
        assert_eq!(channel.connection_count(), 0);
        assert!(channel.rooms_of(conn).is_empty());
    }

    #[test]
    fn test_closed_receiver_is_skipped() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (a, rx_a) = channel.connect(Uuid::new_v4());
        let (b, mut rx_b) = channel.connect(Uuid::new_v4());
        channel.join(room, a);
        channel.join(room, b);
        drop(rx_a);

        assert_eq!(channel.broadcast(room, typing("bob")), 1);
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_order_preserved_per_room() {
        let channel = EventChannel::new();
        let room = Uuid::new_v4();
        let (conn, mut rx) = channel.connect(Uuid::new_v4());
        channel.join(room, conn);

        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            channel.broadcast(room, ServerEvent::TaskDeleted(*id));
        }
        for id in ids {
            assert_eq!(rx.try_recv().unwrap(), ServerEvent::TaskDeleted(id));
        }
    }
}

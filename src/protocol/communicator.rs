// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Point-to-point messaging between ranks.
//!
//! [`Communicator`] is the seam to the process-group runtime: one instance per
//! rank, with blocking (awaiting) receives matched by source rank. The
//! coordinator and worker routines only ever talk through this trait.
//!
//! [`LocalProcessGroup`] is the in-process runtime: each rank runs as a tokio
//! task and every link the protocol uses gets its own unbounded channel, so
//! messages from one source are delivered in order and never mix with another
//! source's messages. Ranks share no state beyond the channels.
//!
//! Links follow the [`Topology`]: coordinator to each worker, each worker to
//! the coordinator, and each worker to its left neighbour. That is `3W - 1`
//! channels for `W` workers. Sending to or receiving from any other rank fails
//! with `CommunicationFailure::Disconnected`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::errors::CommunicationFailure;
use crate::protocol::{Message, Rank, Topology};

#[async_trait]
pub trait Communicator: Send + Sync {
    /// This participant's rank
    fn rank(&self) -> Rank;

    /// Deliver `message` to rank `to`.
    async fn send(&self, to: Rank, message: Message) -> Result<(), CommunicationFailure>;

    /// Wait for the next message from rank `from`.
    ///
    /// Blocks until a message arrives unless the implementation has a receive
    /// timeout configured.
    async fn recv(&mut self, from: Rank) -> Result<Message, CommunicationFailure>;
}

/// Builder for an in-process group wired along a [`Topology`].
pub struct LocalProcessGroup;

impl LocalProcessGroup {
    /// Create one communicator per rank, indexed by rank.
    ///
    /// # Example
    /// ```
    /// use the_carry_chain::protocol::{Communicator, LocalProcessGroup, Message, Rank, Topology};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let topology = Topology::new(1).unwrap();
    /// let mut group = LocalProcessGroup::connect(&topology, None);
    /// let mut worker = group.pop().unwrap();
    /// let coordinator = group.pop().unwrap();
    ///
    /// coordinator.send(Rank(1), Message::CarrySignal { bit: 1 }).await.unwrap();
    /// let received = worker.recv(Rank(0)).await.unwrap();
    /// assert_eq!(received, Message::CarrySignal { bit: 1 });
    /// # }
    /// ```
    pub fn connect(topology: &Topology, receive_timeout: Option<Duration>) -> Vec<LocalCommunicator> {
        let mut group: Vec<LocalCommunicator> = (0..topology.world_size())
            .map(|rank| LocalCommunicator {
                rank: Rank(rank),
                outgoing: HashMap::new(),
                incoming: HashMap::new(),
                receive_timeout,
            })
            .collect();

        for worker in topology.worker_ranks() {
            let mut links = vec![(Rank::COORDINATOR, worker), (worker, Rank::COORDINATOR)];
            if let Some(left) = topology.left_neighbor(worker) {
                links.push((worker, left));
            }

            for (source, destination) in links {
                let (sender, receiver) = mpsc::unbounded_channel();
                group[source.index()].outgoing.insert(destination, sender);
                group[destination.index()].incoming.insert(source, receiver);
            }
        }

        group
    }
}

/// One rank's endpoint in a [`LocalProcessGroup`].
pub struct LocalCommunicator {
    rank: Rank,
    outgoing: HashMap<Rank, mpsc::UnboundedSender<Message>>,
    incoming: HashMap<Rank, mpsc::UnboundedReceiver<Message>>,
    receive_timeout: Option<Duration>,
}

impl LocalCommunicator {
    fn disconnected(&self, peer: Rank) -> CommunicationFailure {
        CommunicationFailure::Disconnected {
            rank: self.rank.index(),
            peer: peer.index(),
        }
    }
}

impl std::fmt::Debug for LocalCommunicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCommunicator")
            .field("rank", &self.rank)
            .field("peers", &self.outgoing.len())
            .field("receive_timeout", &self.receive_timeout)
            .finish()
    }
}

#[async_trait]
impl Communicator for LocalCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    async fn send(&self, to: Rank, message: Message) -> Result<(), CommunicationFailure> {
        let sender = self.outgoing.get(&to).ok_or_else(|| self.disconnected(to))?;
        sender.send(message).map_err(|_| self.disconnected(to))
    }

    async fn recv(&mut self, from: Rank) -> Result<Message, CommunicationFailure> {
        let rank = self.rank;
        let timeout = self.receive_timeout;
        let receiver = match self.incoming.get_mut(&from) {
            Some(receiver) => receiver,
            None => {
                return Err(CommunicationFailure::Disconnected {
                    rank: rank.index(),
                    peer: from.index(),
                })
            }
        };

        let received = match timeout {
            Some(waited) => tokio::time::timeout(waited, receiver.recv())
                .await
                .map_err(|_| CommunicationFailure::Timeout {
                    rank: rank.index(),
                    peer: from.index(),
                    waited,
                })?,
            None => receiver.recv().await,
        };

        received.ok_or(CommunicationFailure::Disconnected {
            rank: rank.index(),
            peer: from.index(),
        })
    }
}

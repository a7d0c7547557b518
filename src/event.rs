use crate::board::{Move, MoveError, MoveOutcome};
use crate::coord::Coord;
use crate::force::Force;


// Everything the session's event loop can receive, delivered one at a time
// in arrival order. The transport reader, the local input reader and the
// connection listener all funnel into a single queue of these.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IncomingEvent {
    // Server only: the listener accepted the remote peer.
    OpponentConnected,
    // Client only: the server declared which color *it* is playing.
    Handshake(Force),
    RemoteMove(Move),
    LocalMove(Move),
    PeerDisconnected,
}

// Messages bound for the remote peer, in send order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutgoingMessage {
    ColorHandshake(Force),
    Move(Move),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TurnCommandError {
    NoGameInProgress,
    IllegalMove(MoveError),
}

// Observations for the presentation layer. The core emits them after the
// fact and never waits on their handling.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted { local_force: Force },
    MoveApplied { by: Force, mv: Move, outcome: MoveOutcome },
    // Squares a remote move traversed that were already visible locally;
    // a hint for a reveal-the-path animation before the board updates.
    RevealPath(Vec<Coord>),
    MoveRejected(TurnCommandError),
}

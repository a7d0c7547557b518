use std::collections::HashSet;
use std::sync::mpsc;

use log::info;

use crate::board::{Move, MoveError};
use crate::coord::Coord;
use crate::event::{IncomingEvent, NotableEvent, OutgoingMessage, TurnCommandError};
use crate::fog;
use crate::force::Force;
use crate::game::GameState;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    // Accepts the connection and assigns colors. Plays the color the
    // operator chose before game start.
    Server,
    // Connects to a server and learns its color from the handshake.
    Client,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionPhase {
    AwaitingOpponent,
    AwaitingColorAssignment,
    Playing,
}

#[derive(Debug)]
pub enum SessionError {
    // The peer broke the handshake/steady-state protocol. No valid shared
    // state remains; terminate cleanly.
    ProtocolViolation(String),
    // The peer sent a move our validator rejects. Both sides run the same
    // deterministic rules, so this means the boards have diverged.
    RuleViolation(MoveError),
    Disconnected,
}

// The per-peer synchronization state machine. `apply_event` is the single
// serialized mutation point: the transport reader and the local input path
// both hand off here, one event at a time, so a move accepted from one
// source can never race a move from the other against a stale turn.
pub struct Session {
    role: Role,
    phase: SessionPhase,
    game: GameState,
    outgoing_tx: mpsc::Sender<OutgoingMessage>,
}

impl Session {
    pub fn new_server(own_force: Force, outgoing_tx: mpsc::Sender<OutgoingMessage>) -> Self {
        let mut game = GameState::new();
        game.set_local_force(own_force);
        Session {
            role: Role::Server,
            phase: SessionPhase::AwaitingOpponent,
            game,
            outgoing_tx,
        }
    }

    pub fn new_client(outgoing_tx: mpsc::Sender<OutgoingMessage>) -> Self {
        Session {
            role: Role::Client,
            phase: SessionPhase::AwaitingColorAssignment,
            game: GameState::new(),
            outgoing_tx,
        }
    }

    pub fn role(&self) -> Role { self.role }
    pub fn phase(&self) -> SessionPhase { self.phase }
    pub fn game(&self) -> &GameState { &self.game }
    pub fn local_force(&self) -> Option<Force> { self.game.local_force() }
    pub fn is_local_turn(&self) -> bool {
        self.phase == SessionPhase::Playing && self.game.is_local_turn()
    }

    // The local player's current fog map. Empty until a color is known.
    pub fn visible_squares(&self) -> HashSet<Coord> {
        match self.game.local_force() {
            Some(force) => fog::visible_set(self.game.board().grid(), force),
            None => HashSet::new(),
        }
    }

    pub fn apply_event(
        &mut self, event: IncomingEvent,
    ) -> Result<Vec<NotableEvent>, SessionError> {
        match event {
            IncomingEvent::OpponentConnected => self.on_opponent_connected(),
            IncomingEvent::Handshake(server_force) => self.on_handshake(server_force),
            IncomingEvent::RemoteMove(mv) => self.on_remote_move(mv),
            IncomingEvent::LocalMove(mv) => self.on_local_move(mv),
            IncomingEvent::PeerDisconnected => Err(SessionError::Disconnected),
        }
    }

    fn on_opponent_connected(&mut self) -> Result<Vec<NotableEvent>, SessionError> {
        if self.role != Role::Server || self.phase != SessionPhase::AwaitingOpponent {
            return Err(SessionError::ProtocolViolation(
                "unexpected connection event".to_owned(),
            ));
        }
        let local_force = self.game.local_force().ok_or_else(|| {
            SessionError::ProtocolViolation("server has no color assigned".to_owned())
        })?;
        self.send(OutgoingMessage::ColorHandshake(local_force))?;
        self.phase = SessionPhase::Playing;
        info!("Opponent connected; we play {:?}", local_force);
        Ok(vec![NotableEvent::GameStarted { local_force }])
    }

    fn on_handshake(&mut self, server_force: Force) -> Result<Vec<NotableEvent>, SessionError> {
        if self.role != Role::Client || self.phase != SessionPhase::AwaitingColorAssignment {
            return Err(SessionError::ProtocolViolation(
                "unexpected handshake".to_owned(),
            ));
        }
        let local_force = server_force.opponent();
        self.game.set_local_force(local_force);
        self.phase = SessionPhase::Playing;
        info!(
            "Server plays {:?}; we play {:?}",
            server_force, local_force
        );
        Ok(vec![NotableEvent::GameStarted { local_force }])
    }

    fn on_remote_move(&mut self, mv: Move) -> Result<Vec<NotableEvent>, SessionError> {
        if self.phase != SessionPhase::Playing {
            return Err(SessionError::ProtocolViolation(
                "move received before the game started".to_owned(),
            ));
        }
        let local_force = self.game.local_force().ok_or_else(|| {
            SessionError::ProtocolViolation("no color assigned".to_owned())
        })?;
        let remote_force = local_force.opponent();
        // Which squares of the move's path do we see right now, before the
        // board changes? The renderer reveals these while the move plays.
        let visible = fog::visible_set(self.game.board().grid(), local_force);
        let seen_path: Vec<Coord> = fog::path_between(mv.from, mv.to)
            .into_iter()
            .filter(|pos| visible.contains(pos))
            .collect();
        // Never trust the sender's post-state: the (from, to) pair goes
        // through the very same validated apply path as a local move.
        let outcome = self
            .game
            .try_move(remote_force, mv)
            .map_err(SessionError::RuleViolation)?;
        info!("Remote move {}", mv.to_algebraic());
        let mut events = Vec::new();
        if !seen_path.is_empty() {
            events.push(NotableEvent::RevealPath(seen_path));
        }
        events.push(NotableEvent::MoveApplied {
            by: remote_force,
            mv,
            outcome,
        });
        Ok(events)
    }

    fn on_local_move(&mut self, mv: Move) -> Result<Vec<NotableEvent>, SessionError> {
        if self.phase != SessionPhase::Playing {
            return Ok(vec![NotableEvent::MoveRejected(
                TurnCommandError::NoGameInProgress,
            )]);
        }
        let Some(local_force) = self.game.local_force() else {
            return Ok(vec![NotableEvent::MoveRejected(
                TurnCommandError::NoGameInProgress,
            )]);
        };
        match self.game.try_move(local_force, mv) {
            Ok(outcome) => {
                // Applied locally first; only then mirrored to the peer.
                self.send(OutgoingMessage::Move(mv))?;
                info!("Local move {}", mv.to_algebraic());
                Ok(vec![NotableEvent::MoveApplied {
                    by: local_force,
                    mv,
                    outcome,
                }])
            }
            Err(err @ MoveError::KingMissing) => Err(SessionError::RuleViolation(err)),
            Err(err) => Ok(vec![NotableEvent::MoveRejected(
                TurnCommandError::IllegalMove(err),
            )]),
        }
    }

    fn send(&self, message: OutgoingMessage) -> Result<(), SessionError> {
        self.outgoing_tx
            .send(message)
            .map_err(|_| SessionError::Disconnected)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn server_session(force: Force) -> (Session, mpsc::Receiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::channel();
        (Session::new_server(force, tx), rx)
    }

    fn client_session() -> (Session, mpsc::Receiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::channel();
        (Session::new_client(tx), rx)
    }

    #[test]
    fn server_declares_its_color_on_connection() {
        let (mut session, rx) = server_session(Force::Black);
        let events = session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        assert_eq!(
            events,
            vec![NotableEvent::GameStarted { local_force: Force::Black }]
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            OutgoingMessage::ColorHandshake(Force::Black)
        );
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(!session.is_local_turn());
    }

    #[test]
    fn client_derives_the_opposite_color() {
        let (mut session, _rx) = client_session();
        assert!(session.visible_squares().is_empty());
        session.apply_event(IncomingEvent::Handshake(Force::Black)).unwrap();
        assert_eq!(session.local_force(), Some(Force::White));
        assert!(session.is_local_turn());
        assert!(!session.visible_squares().is_empty());
    }

    #[test]
    fn local_move_is_applied_then_mirrored() {
        let (mut session, rx) = server_session(Force::White);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        rx.try_recv().unwrap(); // handshake
        let mv = Move::from_algebraic("e2e4").unwrap();
        let events = session.apply_event(IncomingEvent::LocalMove(mv)).unwrap();
        assert!(matches!(events[0], NotableEvent::MoveApplied { by: Force::White, .. }));
        assert_eq!(rx.try_recv().unwrap(), OutgoingMessage::Move(mv));
        assert_eq!(session.game().board().active_force(), Force::Black);
    }

    #[test]
    fn local_move_out_of_turn_is_rejected_not_sent() {
        let (mut session, rx) = server_session(Force::Black);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        rx.try_recv().unwrap();
        let events = session
            .apply_event(IncomingEvent::LocalMove(Move::from_algebraic("e7e5").unwrap()))
            .unwrap();
        assert_eq!(
            events,
            vec![NotableEvent::MoveRejected(TurnCommandError::IllegalMove(
                MoveError::WrongTurnOrder
            ))]
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn move_before_game_start_is_a_soft_rejection() {
        let (mut session, _rx) = client_session();
        let events = session
            .apply_event(IncomingEvent::LocalMove(Move::from_algebraic("e2e4").unwrap()))
            .unwrap();
        assert_eq!(
            events,
            vec![NotableEvent::MoveRejected(TurnCommandError::NoGameInProgress)]
        );
    }

    #[test]
    fn illegal_remote_move_is_fatal() {
        let (mut session, _rx) = server_session(Force::White);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        // Black trying to move a white piece means the boards diverged.
        let result = session.apply_event(IncomingEvent::RemoteMove(
            Move::from_algebraic("e2e4").unwrap(),
        ));
        assert!(matches!(result, Err(SessionError::RuleViolation(_))));
    }

    #[test]
    fn remote_move_of_our_own_piece_is_fatal() {
        let (mut session, _rx) = server_session(Force::White);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        session
            .apply_event(IncomingEvent::LocalMove(Move::from_algebraic("e2e4").unwrap()))
            .unwrap();
        // Black is in turn, but may not relocate a white piece.
        let result = session.apply_event(IncomingEvent::RemoteMove(
            Move::from_algebraic("d2d4").unwrap(),
        ));
        assert!(matches!(
            result,
            Err(SessionError::RuleViolation(MoveError::WrongTurnOrder))
        ));
    }

    #[test]
    fn handshake_on_the_server_side_is_a_protocol_violation() {
        let (mut session, _rx) = server_session(Force::White);
        let result = session.apply_event(IncomingEvent::Handshake(Force::Black));
        assert!(matches!(result, Err(SessionError::ProtocolViolation(_))));
    }

    #[test]
    fn remote_move_reveals_the_visible_part_of_its_path() {
        let (mut session, _rx) = server_session(Force::White);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        session
            .apply_event(IncomingEvent::LocalMove(Move::from_algebraic("e2e4").unwrap()))
            .unwrap();
        // Black's pawn advances d7-d5. Of its path only d5 lies inside
        // White's fog map (the e4 pawn watches it).
        let events = session
            .apply_event(IncomingEvent::RemoteMove(Move::from_algebraic("d7d5").unwrap()))
            .unwrap();
        assert_eq!(
            events[0],
            NotableEvent::RevealPath(vec![Coord::from_algebraic("d5")])
        );
        assert!(matches!(events[1], NotableEvent::MoveApplied { .. }));
    }

    #[test]
    fn remote_knight_move_has_no_intermediate_reveal() {
        let (mut session, _rx) = server_session(Force::White);
        session.apply_event(IncomingEvent::OpponentConnected).unwrap();
        session
            .apply_event(IncomingEvent::LocalMove(Move::from_algebraic("e2e4").unwrap()))
            .unwrap();
        // g8 and f6 are both fogged for White, so nothing is revealed.
        let events = session
            .apply_event(IncomingEvent::RemoteMove(Move::from_algebraic("g8f6").unwrap()))
            .unwrap();
        assert!(matches!(events[0], NotableEvent::MoveApplied { .. }));
        assert_eq!(events.len(), 1);
    }
}

#![forbid(unsafe_code)]

use std::io::{self, BufRead};
use std::net::{TcpListener, TcpStream};
use std::process::exit;
use std::sync::mpsc;
use std::thread;

use clap::{arg, Command};
use itertools::Itertools;
use log::{error, info};

use fog_chess::board::{Move, MoveError};
use fog_chess::event::{IncomingEvent, NotableEvent, OutgoingMessage, TurnCommandError};
use fog_chess::force::Force;
use fog_chess::network;
use fog_chess::session::{Role, Session, SessionError, SessionPhase};
use fog_chess::tui;


fn main() -> io::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let matches = Command::new("fog-chess")
        .about("Fog-of-war chess client/server console app")
        .subcommand_required(true)
        .subcommand(
            Command::new("server")
                .about("Host a game and wait for an opponent")
                .arg(arg!([color] r#"Color the host plays: "white" or "black""#).default_value("white")),
        )
        .subcommand(
            Command::new("client")
                .about("Join a hosted game")
                .arg(arg!(<server_address> "Server address")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub)) => {
            let force: Force = sub
                .get_one::<String>("color")
                .unwrap()
                .parse()
                .map_err(|err: String| io::Error::new(io::ErrorKind::InvalidInput, err))?;
            run_server(force)
        }
        Some(("client", sub)) => run_client(sub.get_one::<String>("server_address").unwrap()),
        _ => unreachable!("subcommand is required"),
    }
}

fn run_server(own_force: Force) -> io::Result<()> {
    let (outgoing_tx, outgoing_rx) = mpsc::channel();
    let session = Session::new_server(own_force, outgoing_tx);
    let listener = TcpListener::bind(("0.0.0.0", network::PORT))?;
    println!("Waiting for an opponent on port {}...", network::PORT);
    let (stream, peer_addr) = listener.accept()?;
    info!("Received connection from {}", peer_addr);
    run_event_loop(session, stream, outgoing_rx, Some(IncomingEvent::OpponentConnected))
}

fn run_client(server_address: &str) -> io::Result<()> {
    let (outgoing_tx, outgoing_rx) = mpsc::channel();
    let session = Session::new_client(outgoing_tx);
    println!("Connecting to {}...", server_address);
    let stream = match TcpStream::connect((server_address, network::PORT)) {
        Ok(stream) => stream,
        Err(err) => {
            // No automatic retry; report and let the operator rerun.
            eprintln!("Could not connect to server at '{}': {}", server_address, err);
            exit(1);
        }
    };
    println!("Waiting for the server to assign colors...");
    run_event_loop(session, stream, outgoing_rx, None)
}

fn run_event_loop(
    mut session: Session, stream: TcpStream,
    outgoing_rx: mpsc::Receiver<OutgoingMessage>, seed_event: Option<IncomingEvent>,
) -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::channel();

    let role = session.role();
    let mut read_stream = stream.try_clone()?;
    let net_tx = event_tx.clone();
    thread::spawn(move || {
        if role == Role::Client {
            match network::read_handshake(&mut read_stream) {
                Ok(force) => {
                    let _ = net_tx.send(IncomingEvent::Handshake(force));
                }
                Err(err) => {
                    error!("Handshake failed: {:?}", err);
                    let _ = net_tx.send(IncomingEvent::PeerDisconnected);
                    return;
                }
            }
        }
        loop {
            match network::read_move(&mut read_stream) {
                Ok(mv) => {
                    if net_tx.send(IncomingEvent::RemoteMove(mv)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    error!("Connection lost: {:?}", err);
                    let _ = net_tx.send(IncomingEvent::PeerDisconnected);
                    return;
                }
            }
        }
    });

    let mut write_stream = stream;
    thread::spawn(move || {
        for message in outgoing_rx {
            let result = match message {
                OutgoingMessage::ColorHandshake(force) => {
                    network::write_handshake(&mut write_stream, force)
                }
                OutgoingMessage::Move(mv) => network::write_move(&mut write_stream, mv),
            };
            if let Err(err) = result {
                error!("Failed to send: {}", err);
                return;
            }
        }
    });

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { return };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                exit(0);
            }
            match Move::from_algebraic(line) {
                Some(mv) => {
                    if event_tx.send(IncomingEvent::LocalMove(mv)).is_err() {
                        return;
                    }
                }
                None => println!(r#"Type moves like "e2e4" (or "quit")."#),
            }
        }
    });

    if let Some(event) = seed_event {
        handle(&mut session, event);
    }
    for event in event_rx {
        handle(&mut session, event);
    }
    Ok(())
}

fn handle(session: &mut Session, event: IncomingEvent) {
    match session.apply_event(event) {
        Ok(events) => {
            for notable in &events {
                announce(session, notable);
            }
            render(session);
        }
        Err(SessionError::Disconnected) => {
            println!("Opponent disconnected.");
            exit(0);
        }
        Err(err) => {
            eprintln!("Fatal session error: {:?}", err);
            exit(1);
        }
    }
}

fn render(session: &Session) {
    if session.phase() != SessionPhase::Playing {
        return;
    }
    let Some(local_force) = session.local_force() else {
        return;
    };
    let visible = session.visible_squares();
    let grid = session.game().board().grid();
    println!("\n{}", tui::render_fogged_grid(grid, &visible, local_force));
    if session.is_local_turn() {
        println!("Your turn!");
    }
}

fn announce(session: &Session, event: &NotableEvent) {
    match event {
        NotableEvent::GameStarted { local_force } => {
            println!("Game started. You play {:?}.", local_force);
        }
        NotableEvent::MoveApplied { by, mv, outcome } => {
            let local = Some(*by) == session.local_force();
            if local {
                println!("Moved {}.", mv.to_algebraic());
                if outcome.opponent_in_check {
                    println!("Your opponent is in check.");
                }
            } else {
                if let Some(captured) = outcome.capture {
                    println!(
                        "Your {:?} on {} was captured!",
                        captured.kind,
                        mv.to.to_algebraic()
                    );
                } else {
                    println!("The opponent made a move.");
                }
                if outcome.opponent_in_check {
                    println!("You are in check!");
                }
            }
        }
        NotableEvent::RevealPath(path) => {
            println!(
                "Movement spotted across: {}",
                path.iter().map(|pos| pos.to_algebraic()).join(", ")
            );
        }
        NotableEvent::MoveRejected(TurnCommandError::NoGameInProgress) => {
            println!("The game has not started yet.");
        }
        NotableEvent::MoveRejected(TurnCommandError::IllegalMove(err)) => {
            let reason = match err {
                MoveError::PieceMissing => "There is no piece of yours there.",
                MoveError::WrongTurnOrder => "It is not your turn.",
                MoveError::FriendlyFire => "One of your own pieces is in the way.",
                MoveError::ImpossibleTrajectory => "This piece cannot move like that.",
                MoveError::UnprotectedKing => "That move would put your King in check!",
                MoveError::KingMissing => "Invalid board state.",
            };
            println!("Invalid move: {}", reason);
        }
    }
}

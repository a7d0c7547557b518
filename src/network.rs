use std::io;

use crate::board::Move;
use crate::coord::{Col, Coord, Row, NUM_COLS, NUM_ROWS};
use crate::force::Force;


pub const PORT: u16 = 15905;

// Handshake payloads are one of these two tags; an oversize length prefix
// means the peer is not speaking our protocol at all.
const MAX_HANDSHAKE_LEN: usize = 16;

#[derive(Debug)]
pub enum CommunicationError {
    Io(io::Error),
    // Received color tag outside {"white", "black"}. Fatal to the session:
    // no valid shared state can be established.
    BadHandshake(String),
    // A move record carried a square index outside [0, 8).
    BadSquare(u8),
}

impl From<io::Error> for CommunicationError {
    fn from(err: io::Error) -> Self {
        CommunicationError::Io(err)
    }
}

fn force_tag(force: Force) -> &'static str {
    match force {
        Force::White => "white",
        Force::Black => "black",
    }
}

// ColorHandshake: u32-LE length prefix plus the server's color tag. Sent
// exactly once, by the server, as the first bytes on the wire.
pub fn write_handshake(writer: &mut impl io::Write, force: Force) -> io::Result<()> {
    let tag = force_tag(force);
    writer.write_all(&(tag.len() as u32).to_le_bytes())?;
    writer.write_all(tag.as_bytes())?;
    writer.flush()
}

pub fn read_handshake(reader: &mut impl io::Read) -> Result<Force, CommunicationError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_HANDSHAKE_LEN {
        return Err(CommunicationError::BadHandshake(format!("<{len} bytes>")));
    }
    let mut tag_buf = vec![0; len];
    reader.read_exact(&mut tag_buf)?;
    let tag = String::from_utf8(tag_buf)
        .map_err(|_| CommunicationError::BadHandshake("<invalid utf-8>".to_owned()))?;
    tag.parse().map_err(|_| CommunicationError::BadHandshake(tag))
}

// MoveMessage: a fixed four-byte record, no framing needed.
pub fn write_move(writer: &mut impl io::Write, mv: Move) -> io::Result<()> {
    let buf = [
        mv.from.col.to_zero_based(),
        mv.from.row.to_zero_based(),
        mv.to.col.to_zero_based(),
        mv.to.row.to_zero_based(),
    ];
    writer.write_all(&buf)?;
    writer.flush()
}

pub fn read_move(reader: &mut impl io::Read) -> Result<Move, CommunicationError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    // Byte layout is col, row, col, row.
    for (&b, limit) in buf.iter().zip([NUM_COLS, NUM_ROWS, NUM_COLS, NUM_ROWS]) {
        if b >= limit {
            return Err(CommunicationError::BadSquare(b));
        }
    }
    let square = |col: u8, row: u8| Coord::new(Row::from_zero_based(row), Col::from_zero_based(col));
    Ok(Move {
        from: square(buf[0], buf[1]),
        to: square(buf[2], buf[3]),
    })
}

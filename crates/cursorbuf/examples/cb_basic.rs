// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Basics of encoding and decoding a message with `ByteBuf`.
//!
//! 1. We encode a login request as an agreed sequence of writes.
//! 2. We hand the buffer to a consumer that performs the same sequence of reads.
//! 3. We dump the raw bytes that travelled between the two.

use cursorbuf::{ByteBuf, LengthPrefix};

const LOGIN_REQUEST: u16 = 0x0101;

fn main() -> cursorbuf::Result<()> {
    let mut message = produce_login("alice", 42, true)?;

    println!("Encoded {} bytes: {}", message.writer_index(), message.hex_string()?);

    consume_login(&mut message)?;

    print!("{}", message.pretty_print()?);

    Ok(())
}

fn produce_login(user: &str, session: u64, remember_me: bool) -> cursorbuf::Result<ByteBuf> {
    let mut buf = ByteBuf::new();

    buf.write_num_be(LOGIN_REQUEST)?;
    buf.write_string_with(LengthPrefix::U8, user)?;
    buf.write_num_le(session)?;
    buf.write_bool(remember_me)?;

    Ok(buf)
}

fn consume_login(buf: &mut ByteBuf) -> cursorbuf::Result<()> {
    let kind = buf.read_num_be::<u16>()?;
    assert_eq!(kind, LOGIN_REQUEST, "unexpected message kind");

    let user = buf.read_string_with(LengthPrefix::U8)?;
    let session = buf.read_num_le::<u64>()?;
    let remember_me = buf.read_bool()?;

    println!("Login from '{user}' in session {session} (remember me: {remember_me}).");
    println!("{} unread bytes left.", buf.readable_bytes());

    Ok(())
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Writing a length header after the body it describes.
//!
//! The body length is not known up front, so we reserve room for the header, write the body
//! sequentially and then patch the header in place with a random-access write.

use cursorbuf::ByteBuf;

fn main() -> cursorbuf::Result<()> {
    let readings = [21.5_f32, 21.7, 22.0, 21.9];

    let mut frame = ByteBuf::new();

    let header_at = frame.writer_index();
    frame.write_num_be(0_u32)?;

    for reading in readings {
        frame.write_num_be(reading)?;
    }

    let body_len = frame.writer_index() - header_at - size_of::<u32>();
    let body_len = u32::try_from(body_len).unwrap_or(u32::MAX);
    frame.put_num_be(header_at, body_len)?;

    println!("Frame: {}", frame.hex_string()?);

    // The receiver trusts the header to know how many readings follow.
    let len = frame.read_num_be::<u32>()?;
    let count = len as usize / size_of::<f32>();
    for _ in 0..count {
        println!("reading: {}", frame.read_num_be::<f32>()?);
    }

    Ok(())
}

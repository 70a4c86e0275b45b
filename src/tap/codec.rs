use super::{
    needs_escape, Platform, TapImage, Video, ESCAPE_BYTE, HEADER_SIZE, LONG_PULSE_MAX,
    TAP_MAGIC, TAP_MAGIC_LEN, TAP_VERSION,
};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{Result, TapError};

const ESCAPE_PAYLOAD_BYTES: usize = 3;

/// Decodes a complete TAP file held in memory.
pub fn decode(data: &[u8]) -> Result<TapImage> {
    let mut reader = ByteReader::<LittleEndian>::new(data);

    let magic = reader.read_ascii(TAP_MAGIC_LEN)?;
    let version = reader.read_u8()?;
    let platform = Platform::from(reader.read_u8()?);
    let video = Video::from(reader.read_u8()?);
    let reserved = reader.read_u8()?;
    let declared_length = reader.read_u32()?;

    if magic != TAP_MAGIC {
        return Err(TapError::BadMagic { found: magic });
    }
    if version != TAP_VERSION {
        return Err(TapError::UnsupportedVersion(version));
    }
    if declared_length as usize != reader.remaining() {
        return Err(TapError::LengthMismatch {
            declared: declared_length,
            actual: reader.remaining(),
        });
    }

    // Short pulses dominate real tapes, so one slot per byte is a good upper bound.
    let mut pulses = Vec::with_capacity(reader.remaining());
    while reader.remaining() > 0 {
        pulses.push(read_pulse(&mut reader)?);
    }

    let mut image = TapImage {
        magic,
        version,
        platform,
        video,
        reserved,
        declared_length,
        pulses,
    };
    // A non-canonical escape (`00 00 00 05`) shrinks to one byte once decoded.
    image.refresh_length();
    Ok(image)
}

/// The escape payload is big-endian whatever order the header uses.
fn read_pulse(reader: &mut ByteReader<'_, LittleEndian>) -> Result<u32> {
    let first = reader.read_u8()?;
    if first != ESCAPE_BYTE {
        return Ok(first as u32);
    }
    Ok(BigEndian::read_u24(reader.read_bytes(ESCAPE_PAYLOAD_BYTES)?))
}

/// Serializes `image`, recomputing the header length from its pulses.
pub fn encode(image: &TapImage) -> Vec<u8> {
    let length = image.encoded_length();
    let mut writer = ByteWriter::<LittleEndian>::with_capacity(HEADER_SIZE + length as usize);

    writer.write_ascii(&image.magic);
    writer.write_u8(image.version);
    writer.write_u8(image.platform.into());
    writer.write_u8(image.video.into());
    writer.write_u8(image.reserved);
    writer.write_u32(length);

    for &pulse in &image.pulses {
        write_pulse(&mut writer, pulse);
    }

    writer.into_bytes()
}

fn write_pulse(writer: &mut ByteWriter<LittleEndian>, pulse: u32) {
    if needs_escape(pulse) {
        let mut payload = [0u8; ESCAPE_PAYLOAD_BYTES];
        BigEndian::write_u24(&mut payload, pulse.min(LONG_PULSE_MAX));
        writer.write_u8(ESCAPE_BYTE);
        writer.write_bytes(&payload);
    } else {
        writer.write_u8(pulse as u8);
    }
}

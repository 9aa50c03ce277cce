//! Packed extra-data codec.
//!
//! This layout is bit-exact and feeds the identity hash of a quorum game,
//! so decoding is strict: every declared length must match the actual
//! payload down to the last byte.
//!
//! ```text
//! sequence_number   u64 BE
//! mechanism_count   u16 BE
//! mechanism_id      u16 BE               (count times)
//! blob_len u32 BE, blob bytes            (count times)
//! ```

use accord_primitives::MechanismId;

use crate::errors::ExtraDataError;

/// The contents of a decoded extra-data payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedExtraData {
    pub sequence_number: u64,
    pub mechanism_ids: Vec<MechanismId>,
    pub blobs: Vec<Vec<u8>>,
}

/// Encodes the canonical packed form of a quorum game's creation inputs.
///
/// # Panics
///
/// If the mechanism and blob arities differ or the mechanism count does
/// not fit a `u16`. Callers construct both slices together, so this is a
/// programming error rather than an input error.
pub fn encode_extra_data(
    sequence_number: u64,
    mechanism_ids: &[MechanismId],
    blobs: &[Vec<u8>],
) -> Vec<u8> {
    assert_eq!(
        mechanism_ids.len(),
        blobs.len(),
        "extra: mechanism/blob arity mismatch"
    );
    let count: u16 = mechanism_ids
        .len()
        .try_into()
        .expect("extra: mechanism count overflows u16");

    let blob_bytes: usize = blobs.iter().map(|b| 4 + b.len()).sum();
    let mut out = Vec::with_capacity(8 + 2 + 2 * mechanism_ids.len() + blob_bytes);

    out.extend_from_slice(&sequence_number.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    for id in mechanism_ids {
        out.extend_from_slice(&id.as_u16().to_be_bytes());
    }
    for blob in blobs {
        let len: u32 = blob.len().try_into().expect("extra: blob length overflows u32");
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(blob);
    }
    out
}

/// Decodes a packed extra-data payload, rejecting any length mismatch.
pub fn decode_extra_data(raw: &[u8]) -> Result<DecodedExtraData, ExtraDataError> {
    let mut rd = Reader::new(raw);

    let sequence_number = u64::from_be_bytes(rd.take::<8>()?);
    let count = u16::from_be_bytes(rd.take::<2>()?) as usize;
    if count == 0 {
        return Err(ExtraDataError::EmptyMechanismList);
    }

    let mut mechanism_ids = Vec::with_capacity(count);
    for _ in 0..count {
        mechanism_ids.push(MechanismId::new(u16::from_be_bytes(rd.take::<2>()?)));
    }

    let mut blobs = Vec::with_capacity(count);
    for _ in 0..count {
        let len = u32::from_be_bytes(rd.take::<4>()?) as usize;
        blobs.push(rd.take_slice(len)?.to_vec());
    }

    rd.finish()?;

    Ok(DecodedExtraData {
        sequence_number,
        mechanism_ids,
        blobs,
    })
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ExtraDataError> {
        let slice = self.take_slice(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(slice);
        Ok(arr)
    }

    fn take_slice(&mut self, len: usize) -> Result<&'a [u8], ExtraDataError> {
        let remaining = self.buf.len() - self.pos;
        if remaining < len {
            return Err(ExtraDataError::Truncated {
                needed: len - remaining,
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn finish(self) -> Result<(), ExtraDataError> {
        let left = self.buf.len() - self.pos;
        if left != 0 {
            return Err(ExtraDataError::TrailingBytes(left));
        }
        Ok(())
    }
}

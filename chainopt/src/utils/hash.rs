//! Deterministic chain fingerprints.
//!
//! Chain ids must be stable across calls and processes (they are the last
//! tie-break when scores are equal), so the std `DefaultHasher` is not used.
//! The digest is 64-bit FNV-1a streamed over the parts with a `|` between
//! them, so no joined string is allocated.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const SEPARATOR: u8 = b'|';

/// 16 hex digit fingerprint of an ordered list of parts
pub fn fingerprint<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = FNV_OFFSET;
    let mut absorb = |byte: u8| {
        state = (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
    };
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            absorb(SEPARATOR);
        }
        part.bytes().for_each(&mut absorb);
    }
    format!("{:016x}", state)
}

//! Hash-key codec: packs a contiguous slice of signature values into a
//! fixed-width byte string usable as a prefix-searchable bucket key.
//!
//! Each `u64` hash value contributes its low `W` bytes, little-endian, where
//! `W` is the configured hash-value width (`2`, `4`, or `8` bytes). A band of
//! `K` hash values therefore encodes to exactly `W * K` bytes, and a query
//! prefix of `K' <= K` values encodes to `W * K'` bytes that are a true byte
//! prefix of the full band's key — which is what makes binary-search prefix
//! lookup correct.

/// Supported hash-value encoding widths, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashValueWidth {
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl HashValueWidth {
    #[must_use]
    pub fn bytes(self) -> usize {
        self as usize
    }
}

/// Encode one hash value using its low `width` bytes, little-endian.
fn encode_one(value: u64, width: HashValueWidth, out: &mut Vec<u8>) {
    let full = value.to_le_bytes();
    out.extend_from_slice(&full[..width.bytes()]);
}

/// Encode a contiguous slice of hash values into a fixed-width byte key.
///
/// The returned buffer has length `width.bytes() * values.len()`.
#[must_use]
pub fn encode_key(values: &[u64], width: HashValueWidth) -> Vec<u8> {
    let mut out = Vec::with_capacity(width.bytes() * values.len());
    for &value in values {
        encode_one(value, width, &mut out);
    }
    out
}

/// Encode a band of exactly `k` hash values starting at `band_index * k` in
/// `signature`.
///
/// # Panics
///
/// Panics if the signature is too short to contain the requested band — a
/// caller must have already validated `signature.len() >= k * l` per
/// [`crate::forest::LshForest::add`]'s contract.
#[must_use]
pub fn encode_band(signature: &[u64], band_index: usize, k: usize, width: HashValueWidth) -> Vec<u8> {
    let start = band_index * k;
    let end = start + k;
    assert!(
        end <= signature.len(),
        "band [{start}, {end}) out of bounds for signature of length {}",
        signature.len()
    );
    encode_key(&signature[start..end], width)
}

/// Encode a query prefix of `k_prime <= k` hash values from the band starting
/// at `band_index * k` in `signature`.
///
/// The configured band width `k` (not `k_prime`) determines where the band
/// starts; only the number of values encoded is narrowed to `k_prime`.
///
/// # Panics
///
/// Panics if `k_prime > k`, or the signature is too short.
#[must_use]
pub fn encode_query_prefix(
    signature: &[u64],
    band_index: usize,
    k: usize,
    k_prime: usize,
    width: HashValueWidth,
) -> Vec<u8> {
    assert!(k_prime <= k, "k' ({k_prime}) must not exceed configured k ({k})");
    let start = band_index * k;
    let end = start + k_prime;
    assert!(
        end <= signature.len(),
        "prefix [{start}, {end}) out of bounds for signature of length {}",
        signature.len()
    );
    encode_key(&signature[start..end], width)
}

//! Validator signature packaging.
//!
//! The withdraw instruction carries exactly [`MAX_VALIDATORS`] signature
//! slots. The program walks the slots in order and stops once the required
//! threshold is met, so real signatures occupy the first N slots in ascending
//! validator-index order and the remainder are zero padding.

use stable_bridge_codec::to_fixed;

use crate::AttestationError;

/// Validator capacity of the pool, and the physical length of every signature array
pub const MAX_VALIDATORS: usize = 16;

/// One validator's secp256k1 signature over the withdrawal message hash
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureTriple {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Recovery id
    pub v: u8,
}

impl SignatureTriple {
    /// The filler written into unused slots
    pub const PADDING: Self = Self {
        r: [0u8; 32],
        s: [0u8; 32],
        v: 0,
    };

    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }
}

/// Signatures as parallel component vectors, the shape validators usually hand back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureComponents {
    pub r: Vec<Vec<u8>>,
    pub s: Vec<Vec<u8>>,
    pub v: Vec<u8>,
}

impl SignatureComponents {
    /// Zip the components into triples, checking shape but not content.
    pub fn triples(&self) -> Result<Vec<SignatureTriple>, AttestationError> {
        if self.r.len() != self.s.len() || self.r.len() != self.v.len() {
            return Err(AttestationError::MismatchedSignatureComponents {
                r: self.r.len(),
                s: self.s.len(),
                v: self.v.len(),
            });
        }

        self.r
            .iter()
            .zip(&self.s)
            .zip(&self.v)
            .map(|((r, s), v)| -> Result<SignatureTriple, AttestationError> {
                Ok(SignatureTriple {
                    r: to_fixed("signature r", r)?,
                    s: to_fixed("signature s", s)?,
                    v: *v,
                })
            })
            .collect()
    }
}

/// Signature arrays in the fixed wire layout of the withdraw instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedSignatures {
    pub r: [[u8; 32]; MAX_VALIDATORS],
    pub s: [[u8; 32]; MAX_VALIDATORS],
    pub v: [u8; MAX_VALIDATORS],
    signed: usize,
}

impl PackedSignatures {
    /// Number of caller-supplied signatures (the rest is padding)
    pub fn signed_count(&self) -> usize {
        self.signed
    }

    /// Slot `index` as a triple.
    pub fn slot(&self, index: usize) -> Option<SignatureTriple> {
        (index < MAX_VALIDATORS).then(|| SignatureTriple {
            r: self.r[index],
            s: self.s[index],
            v: self.v[index],
        })
    }

    /// All 16 slots, padding included.
    pub fn slots(&self) -> impl Iterator<Item = SignatureTriple> + '_ {
        (0..MAX_VALIDATORS).filter_map(|i| self.slot(i))
    }
}

/// Pad `triples` to the fixed 16-slot layout.
///
/// Order is preserved and nothing is deduplicated; duplicate detection needs
/// the live validator set.
pub fn pack_signatures(triples: &[SignatureTriple]) -> Result<PackedSignatures, AttestationError> {
    if triples.len() > MAX_VALIDATORS {
        return Err(AttestationError::TooManySignatures {
            got: triples.len(),
            max: MAX_VALIDATORS,
        });
    }

    let mut packed = PackedSignatures {
        r: [[0u8; 32]; MAX_VALIDATORS],
        s: [[0u8; 32]; MAX_VALIDATORS],
        v: [0u8; MAX_VALIDATORS],
        signed: triples.len(),
    };
    for (i, triple) in triples.iter().enumerate() {
        packed.r[i] = triple.r;
        packed.s[i] = triple.s;
        packed.v[i] = triple.v;
    }
    Ok(packed)
}

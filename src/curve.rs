use serde::Serialize;

use crate::FieldElement;

/// Little-endian modulus of the bn128 scalar field.
const BN128_MODULUS: [u8; 32] = [
    0x01, 0x00, 0x00, 0xf0, 0x93, 0xf5, 0xe1, 0x43, 0x91, 0x70, 0xb9, 0x79, 0x48, 0xe8, 0x33,
    0x28, 0x5d, 0x58, 0x81, 0x81, 0xb6, 0x45, 0x50, 0xb8, 0x29, 0xa0, 0x31, 0xe1, 0x72, 0x4e,
    0x64, 0x30,
];

/// Little-endian modulus of the bls12381 scalar field.
const BLS12_381_MODULUS: [u8; 32] = [
    0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0x02, 0xa4, 0xbd,
    0x53, 0x05, 0xd8, 0xa1, 0x09, 0x08, 0xd8, 0x39, 0x33, 0x48, 0x7d, 0x9d, 0x29, 0x53, 0xa7,
    0xed, 0x73,
];

/// Little-endian goldilocks modulus.
const GOLDILOCKS_MODULUS: [u8; 8] = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff];

/// A curve identified by the prime modulus of its scalar field.
///
/// The container format does not carry a curve tag; the identity is implied by
/// the prime found in the header section. An unknown prime is not an error, it
/// simply leaves the curve unidentified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Curve {
    /// The BN-family curve used by default in circom artifacts.
    Bn128,
    /// The BLS-family curve.
    Bls12_381,
    /// The 64-bit goldilocks field.
    Goldilocks,
}

impl Curve {
    /// Conventional lowercase name of the curve.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bn128 => "bn128",
            Self::Bls12_381 => "bls12381",
            Self::Goldilocks => "goldilocks",
        }
    }

    /// Look up a curve from a prime modulus.
    ///
    /// The comparison is numeric so the declared byte width of the prime does
    /// not affect the lookup.
    pub fn from_prime(prime: &FieldElement) -> Option<Self> {
        let value = prime.to_biguint();
        let table: [(&[u8], Self); 3] = [
            (&BN128_MODULUS, Self::Bn128),
            (&BLS12_381_MODULUS, Self::Bls12_381),
            (&GOLDILOCKS_MODULUS, Self::Goldilocks),
        ];

        table
            .into_iter()
            .find(|(modulus, _)| value == num_bigint::BigUint::from_bytes_le(modulus))
            .map(|(_, curve)| curve)
    }

    /// The prime modulus of the scalar field, little-endian.
    pub const fn modulus_le(self) -> &'static [u8] {
        match self {
            Self::Bn128 => &BN128_MODULUS,
            Self::Bls12_381 => &BLS12_381_MODULUS,
            Self::Goldilocks => &GOLDILOCKS_MODULUS,
        }
    }
}

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// An unsigned integer of a fixed byte width, stored little-endian.
///
/// The width (`n8`) is declared once per container and applies to every field
/// element in every subsequent section. The container layer treats values as
/// opaque byte buffers; arithmetic is delegated to [`BigUint`] conversions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement {
    bytes: Vec<u8>,
}

impl FieldElement {
    /// Build an element from its little-endian wire representation.
    pub fn from_le_bytes<B>(bytes: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Encode an arbitrary-precision value into `n8` little-endian bytes.
    ///
    /// Fails with [`Error::MalformedFieldWidth`] when the value does not fit
    /// the width.
    pub fn from_biguint(value: &BigUint, n8: usize) -> Result<Self> {
        let mut bytes = value.to_bytes_le();

        if bytes.len() > n8 {
            return Err(Error::MalformedFieldWidth(n8 as u32));
        }

        bytes.resize(n8, 0);

        Ok(Self { bytes })
    }

    /// Encode a machine word into `n8` little-endian bytes.
    pub fn from_u64(value: u64, n8: usize) -> Result<Self> {
        Self::from_biguint(&BigUint::from(value), n8)
    }

    /// The multiplicative identity at the given width.
    pub fn one(n8: usize) -> Self {
        let mut bytes = vec![0u8; n8.max(1)];

        bytes[0] = 1;

        Self { bytes }
    }

    /// Decode into an arbitrary-precision value. Never truncates to a machine
    /// word.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.bytes)
    }

    /// Byte width of this element.
    pub fn n8(&self) -> usize {
        self.bytes.len()
    }

    /// Little-endian wire representation.
    pub fn as_le_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the least significant bit is set.
    pub fn is_odd(&self) -> bool {
        self.bytes.first().map(|b| b & 1 == 1).unwrap_or(false)
    }

    /// Loose sanity check for a prime modulus: odd and greater than one.
    ///
    /// Full primality testing is out of scope; this only rejects values that
    /// cannot possibly be an odd-prime field modulus.
    pub fn check_prime(&self) -> Result<()> {
        let gt_one = self.bytes.iter().skip(1).any(|b| *b != 0)
            || self.bytes.first().map(|b| *b > 1).unwrap_or(false);

        if self.is_odd() && gt_one {
            Ok(())
        } else {
            Err(Error::InvalidPrime(self.clone()))
        }
    }
}

impl From<Vec<u8>> for FieldElement {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for FieldElement {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldElement {
    fn cmp(&self, other: &Self) -> Ordering {
        // numeric order regardless of width
        self.to_biguint().cmp(&other.to_biguint())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.bytes.clone();

        be.reverse();

        write!(f, "0x{}", hex::encode(be))
    }
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

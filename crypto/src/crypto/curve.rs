//! # Curve25519 KCDSA Primitive
//!
//! The three curve operations the signing protocol is built on:
//!
//! - `keygen(k)` → public u-coordinate `P` and signing scalar `s`
//! - `sign(h, x, s)` → response scalar `v = (x − h)·s mod ℓ`
//! - `verify(v, h, P)` → commitment u-coordinate `Y = u(v·abs(P) + h·G)`
//!
//! Public keys are X25519 public keys: the Montgomery u-coordinate of
//! `clamp(k)·G`. Signing needs more than an x-only ladder gives us, so the
//! group arithmetic runs on the Edwards form via `curve25519-dalek`.
//!
//! ## Sign conventions
//!
//! A u-coordinate names two points, `±P`. The scheme picks one of them,
//! `abs(P)`, as the point whose Montgomery v-coordinate is even. The base
//! point `G` follows the same rule: u = 9 with the *even* v, which is the
//! negation of the RFC 7748 base point. Under the standard birational map
//! that makes `G` correspond to `−B` on Edwards25519.
//!
//! `keygen` picks `s` such that `s·abs(P) = G`. With that, for an honest
//! signature `v·abs(P) + h·G = (x − h)·G + h·G = x·G`, whose u-coordinate is
//! the commitment produced from the ephemeral scalar `x`.
//!
//! Field arithmetic for the lift from `u` to an Edwards point is done with
//! `num-bigint`; it only runs once per keygen or verification.

use std::sync::OnceLock;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use x25519_dalek::X25519_BASEPOINT_BYTES;

use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};

/// Montgomery curve coefficient `A` in `v² = u³ + A·u² + u`.
const MONTGOMERY_A: u32 = 486_662;

/// `sqrt(−486664) mod p`, little-endian. This is the root for which the
/// map `x = c·u / v` sends the RFC 7748 base point to the Ed25519 base point.
const MONTGOMERY_TO_EDWARDS: [u8; 32] = [
    0xe7, 0x81, 0xba, 0x00, 0x55, 0xfb, 0x91, 0x33, 0x7d, 0xe5, 0x82, 0xb4, 0x2e, 0x2c, 0x5e, 0x3a,
    0x81, 0xb0, 0x03, 0xfc, 0x23, 0xf7, 0x84, 0x2d, 0x44, 0xf9, 0x5f, 0x9f, 0x0b, 0x12, 0xd9, 0x70,
];

/// Output of [`keygen`].
pub struct Keygen {
    /// Montgomery u-coordinate of `clamp(k)·G`.
    pub public: [u8; PUBLIC_KEY_LENGTH],
    /// Scalar `s` with `s·abs(P) = G`.
    pub private: Scalar,
}

/// Applies the X25519 clamp: clear the low three bits, clear bit 255, set
/// bit 254.
pub fn clamp(mut k: [u8; PRIVATE_KEY_LENGTH]) -> [u8; PRIVATE_KEY_LENGTH] {
    k[0] &= 248;
    k[31] &= 127;
    k[31] |= 64;
    k
}

/// Public u-coordinate for key material `k` (clamped internally).
pub fn public_point(k: &[u8; PRIVATE_KEY_LENGTH]) -> [u8; PUBLIC_KEY_LENGTH] {
    x25519_dalek::x25519(clamp(*k), X25519_BASEPOINT_BYTES)
}

/// Derives the public point and signing scalar from 32 bytes of key
/// material.
pub fn keygen(k: &[u8; PRIVATE_KEY_LENGTH]) -> Keygen {
    let clamped = clamp(*k);
    let public = public_point(&clamped);

    let scalar = Scalar::from_bytes_mod_order(clamped);
    let point = EdwardsPoint::mul_base(&scalar);

    // In Edwards terms G is −B, so clamp(k)·G is −point. If abs(P) is that
    // point, k itself satisfies k·G = abs(P); otherwise −k does. The lift
    // cannot fail here: `public` is the u-coordinate of a real point.
    let k_abs = match lift_abs(&public) {
        Some(abs) if abs == point => -scalar,
        _ => scalar,
    };

    Keygen {
        public,
        private: k_abs.invert(),
    }
}

/// Response scalar `v = (x − h)·s mod ℓ`, canonical little-endian.
///
/// `x` is the clamped ephemeral key material and `h` the challenge; both are
/// reduced mod ℓ first.
pub fn sign(h: &[u8; 32], x: &[u8; 32], s: &Scalar) -> [u8; 32] {
    let x = Scalar::from_bytes_mod_order(clamp(*x));
    let h = Scalar::from_bytes_mod_order(*h);
    ((x - h) * s).to_bytes()
}

/// Recovers the commitment `Y = u(v·abs(P) + h·G)`.
///
/// Returns `None` when `v` is not a canonical scalar, or when `P` is not a
/// canonical field element or is not the u-coordinate of a point on the
/// curve (twist points included).
pub fn verify(v: &[u8; 32], h: &[u8; 32], public: &[u8; 32]) -> Option<[u8; 32]> {
    let v: Option<Scalar> = Scalar::from_canonical_bytes(*v).into();
    let v = v?;
    let h = Scalar::from_bytes_mod_order(*h);
    let abs = lift_abs(public)?;

    // h·G = h·(−B) = (−h)·B.
    let y = EdwardsPoint::vartime_double_scalar_mul_basepoint(&v, &abs, &-h);
    Some(y.to_montgomery().to_bytes())
}

// ---------------------------------------------------------------------------
// Field arithmetic over GF(2^255 − 19)
// ---------------------------------------------------------------------------

struct Field {
    p: BigUint,
    sqrt_m1: BigUint,
    montgomery_to_edwards: BigUint,
}

fn field() -> &'static Field {
    static FIELD: OnceLock<Field> = OnceLock::new();
    FIELD.get_or_init(|| {
        let p = (BigUint::one() << 255u32) - 19u32;
        let sqrt_m1 = BigUint::from(2u32).modpow(&((&p - 1u32) >> 2u32), &p);
        Field {
            sqrt_m1,
            montgomery_to_edwards: BigUint::from_bytes_le(&MONTGOMERY_TO_EDWARDS),
            p,
        }
    })
}

impl Field {
    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    fn invert(&self, a: &BigUint) -> BigUint {
        a.modpow(&(&self.p - 2u32), &self.p)
    }

    /// Square root for p ≡ 5 (mod 8), or `None` for non-residues.
    fn sqrt(&self, a: &BigUint) -> Option<BigUint> {
        let a = a % &self.p;
        let r = a.modpow(&((&self.p + 3u32) >> 3u32), &self.p);
        let r2 = self.mul(&r, &r);
        if r2 == a {
            Some(r)
        } else if r2 == (&self.p - &a) % &self.p {
            Some(self.mul(&r, &self.sqrt_m1))
        } else {
            None
        }
    }
}

fn is_odd(n: &BigUint) -> bool {
    n.to_bytes_le()[0] & 1 == 1
}

fn to_le_32(n: &BigUint) -> [u8; 32] {
    let bytes = n.to_bytes_le();
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

/// Lifts a u-coordinate to the Edwards point for `abs(P)`, the Montgomery
/// point with that u and an even v.
fn lift_abs(u_bytes: &[u8; 32]) -> Option<EdwardsPoint> {
    let f = field();
    let u = BigUint::from_bytes_le(u_bytes);
    if u >= f.p {
        return None;
    }

    let u_plus_one = (&u + 1u32) % &f.p;
    if u.is_zero() || u_plus_one.is_zero() {
        // u = 0 is 2-torsion and u = −1 has no affine Edwards image.
        return None;
    }

    let u2 = f.mul(&u, &u);
    let rhs = (f.mul(&u2, &u) + f.mul(&u2, &BigUint::from(MONTGOMERY_A)) + &u) % &f.p;
    let mut v = f.sqrt(&rhs)?;
    if is_odd(&v) {
        v = &f.p - v;
    }

    // x = c·u / v, y = (u − 1) / (u + 1)
    let x = f.mul(&f.mul(&f.montgomery_to_edwards, &u), &f.invert(&v));
    let y = f.mul(&((&u + &f.p - 1u32) % &f.p), &f.invert(&u_plus_one));

    let mut compressed = to_le_32(&y);
    if is_odd(&x) {
        compressed[31] |= 0x80;
    }
    CompressedEdwardsY(compressed).decompress()
}

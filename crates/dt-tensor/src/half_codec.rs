//! Bit-level conversion between `f32` and 16-bit half-precision floats.
//!
//! The codec works directly on IEEE-754 bit fields:
//!
//! | format | sign | exponent (bias) | mantissa |
//! |--------|------|-----------------|----------|
//! | f32    | 31   | 30..23 (127)    | 22..0    |
//! | f16    | 15   | 14..10 (15)     | 9..0     |
//!
//! It is deliberately narrower than a full IEEE conversion (and than
//! `half::f16::from_f32`):
//!
//! - the mantissa is truncated to its top 10 bits, never rounded;
//! - results that would be subnormal flush to signed zero;
//! - exponents past the half range saturate to signed infinity, NaN included;
//! - decoding drops the sign of zero and treats every non-zero pattern as a
//!   normal number, so `0x7C00` decodes to `65536.0` rather than infinity and
//!   half subnormals decode as normals with exponent -15.

/// Sign bit of a half-precision value.
pub const F16_SIGN_MASK: u16 = 0x8000;
/// Exponent field of a half-precision value (all ones = infinity).
pub const F16_EXP_MASK: u16 = 0x7C00;
/// Mantissa field of a half-precision value.
pub const F16_MANTISSA_MASK: u16 = 0x03FF;

const F32_BIAS: i32 = 127;
const F16_BIAS: i32 = 15;
const F16_EXP_MAX: i32 = 31;

/// Encode an `f32` into half-precision bits.
pub fn encode_half(value: f32) -> u16 {
    let bits = value.to_bits();

    let sign = ((bits >> 16) as u16) & F16_SIGN_MASK;
    let exponent = ((bits >> 23) & 0xFF) as i32 - F32_BIAS + F16_BIAS;
    let mantissa = ((bits >> 13) as u16) & F16_MANTISSA_MASK;

    if exponent <= 0 {
        return sign;
    }
    if exponent >= F16_EXP_MAX {
        return sign | F16_EXP_MASK;
    }

    sign | ((exponent as u16) << 10) | mantissa
}

/// Decode half-precision bits into an `f32`.
///
/// Both `+0` and `-0` decode to `+0.0`.
pub fn decode_half(bits: u16) -> f32 {
    if bits & !F16_SIGN_MASK == 0 {
        return 0.0;
    }

    let sign = u32::from(bits & F16_SIGN_MASK) << 16;
    // Field is 5 bits wide, so the re-biased value stays within 112..=143.
    let exponent = u32::from((bits & F16_EXP_MASK) >> 10) + (F32_BIAS - F16_BIAS) as u32;
    let mantissa = u32::from(bits & F16_MANTISSA_MASK) << 13;

    f32::from_bits(sign | (exponent << 23) | mantissa)
}

/// Reinterpret stored half bits as a [`half::f16`].
///
/// This is a bit cast, not a conversion: the value keeps the truncation
/// applied by [`encode_half`].
pub fn to_half(bits: u16) -> half::f16 {
    half::f16::from_bits(bits)
}

/// Reinterpret a [`half::f16`] as raw bits suitable for F16 storage.
pub fn from_half(value: half::f16) -> u16 {
    value.to_bits()
}

// libs/booking-sync-cell/src/services/signature.rs
//
// HMAC-SHA256 verification of inbound webhook bodies. The signature travels
// base64-encoded in the `x-sesami-signature` header and is checked against
// the raw body bytes before anything is parsed.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-sesami-signature";

/// Constant-time check of `signature` against the body. A signature that is
/// not valid base64 fails like any other mismatch.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Produce the signature Sesami would send for `body`.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(body);
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

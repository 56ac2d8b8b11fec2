//! HMAC-SHA512 request signing

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Sign a canonical request body
///
/// Returns `base64(HMAC-SHA512(secret, body))`. The body must be the exact
/// bytes that go on the wire; any re-encoding after signing invalidates the
/// signature on the exchange side.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

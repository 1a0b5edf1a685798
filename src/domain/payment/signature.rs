//! Paytm checksum signing.
//!
//! The checksum is a salted SHA-256 of the request parameters, encrypted with
//! AES-128-CBC under the merchant key and base64 encoded. The byte layout is
//! fixed by the provider and must be reproduced exactly:
//!
//! 1. values of the key-sorted parameters joined with `|` (`"null"` becomes `""`)
//! 2. a 4-character salt (3 random bytes, standard base64)
//! 3. `hex(sha256(serialized + "|" + salt)) + salt`
//! 4. AES-128-CBC, PKCS#7, IV `@@@@&&&&####$$$$`, key = merchant key
//!    null-padded or truncated to 16 bytes
//! 5. standard base64 of the ciphertext

use std::collections::BTreeMap;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Parameters to sign, ordered by key.
pub type SignaturePayload = BTreeMap<String, String>;

const IV: [u8; 16] = *b"@@@@&&&&####$$$$";
const KEY_LEN: usize = 16;
const SALT_BYTES: usize = 3;
const SALT_LEN: usize = 4;
const FIELD_SEPARATOR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("merchant key is empty")]
    EmptySecret,

    #[error("salt must be 4 characters")]
    InvalidSalt,

    #[error("checksum is not valid base64")]
    MalformedToken,

    #[error("checksum could not be decrypted")]
    Decryption,
}

/// Signs `payload` with a fresh random salt.
pub fn sign(payload: &SignaturePayload, secret: &str) -> Result<String, SignatureError> {
    let salt = generate_salt();
    sign_with_salt(payload, secret, &salt)
}

/// Signs `payload` with a caller-chosen salt.
pub(crate) fn sign_with_salt(
    payload: &SignaturePayload,
    secret: &str,
    salt: &str,
) -> Result<String, SignatureError> {
    if salt.len() != SALT_LEN {
        return Err(SignatureError::InvalidSalt);
    }
    let key = derive_key(secret)?;
    let hash = salted_hash(&serialize(payload), salt);
    let ciphertext = Aes128CbcEnc::new(&key.into(), &IV.into())
        .encrypt_padded_vec_mut::<Pkcs7>(hash.as_bytes());
    Ok(STANDARD.encode(ciphertext))
}

/// Checks a checksum the way the provider does.
///
/// Decrypts the token, takes its trailing salt, recomputes the hash for
/// `payload` and compares in constant time. Any malformed input is simply
/// not valid.
pub fn verify(payload: &SignaturePayload, secret: &str, token: &str) -> bool {
    let Ok(hash) = decrypt(secret, token) else {
        return false;
    };
    let Some(salt) = hash
        .len()
        .checked_sub(SALT_LEN)
        .and_then(|start| hash.get(start..))
    else {
        return false;
    };
    let expected = salted_hash(&serialize(payload), salt);
    expected.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// Canonical string the hash is computed over.
pub fn serialize(payload: &SignaturePayload) -> String {
    payload
        .values()
        .map(|value| if value == "null" { "" } else { value.as_str() })
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

fn salted_hash(serialized: &str, salt: &str) -> String {
    let digest = Sha256::digest(format!("{serialized}{FIELD_SEPARATOR}{salt}").as_bytes());
    format!("{}{}", hex::encode(digest), salt)
}

fn generate_salt() -> String {
    let bytes: [u8; SALT_BYTES] = rand::thread_rng().gen();
    STANDARD.encode(bytes)
}

fn derive_key(secret: &str) -> Result<[u8; KEY_LEN], SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptySecret);
    }
    let mut key = [0u8; KEY_LEN];
    let bytes = secret.as_bytes();
    let len = bytes.len().min(KEY_LEN);
    key[..len].copy_from_slice(&bytes[..len]);
    Ok(key)
}

fn decrypt(secret: &str, token: &str) -> Result<String, SignatureError> {
    let key = derive_key(secret)?;
    let ciphertext = STANDARD
        .decode(token.trim())
        .map_err(|_| SignatureError::MalformedToken)?;
    let plain = Aes128CbcDec::new(&key.into(), &IV.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| SignatureError::Decryption)?;
    String::from_utf8(plain).map_err(|_| SignatureError::Decryption)
}

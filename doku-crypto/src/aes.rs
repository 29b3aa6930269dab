//! AES-CBC with a fixed all-zero IV and PKCS#7 padding.
//!
//! The key length picks the variant: 16 bytes for AES-128, 24 for AES-192,
//! 32 for AES-256.

use aes::cipher::{
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7,
};
use aes::{Aes128, Aes192, Aes256};

use doku_types::SigningError;

const ZERO_IV: [u8; 16] = [0; 16];

/// Encrypts `plaintext` under `key`.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, SigningError> {
    if plaintext.is_empty() {
        return Err(SigningError::EmptyPlaintext);
    }
    match key.len() {
        16 => cbc_encrypt::<Aes128>(key, plaintext),
        24 => cbc_encrypt::<Aes192>(key, plaintext),
        32 => cbc_encrypt::<Aes256>(key, plaintext),
        len => Err(SigningError::InvalidKeyLength(len)),
    }
}

/// Decrypts `ciphertext` under `key` and strips the padding.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, SigningError> {
    if ciphertext.is_empty() {
        return Err(SigningError::InvalidCiphertext);
    }
    match key.len() {
        16 => cbc_decrypt::<Aes128>(key, ciphertext),
        24 => cbc_decrypt::<Aes192>(key, ciphertext),
        32 => cbc_decrypt::<Aes256>(key, ciphertext),
        len => Err(SigningError::InvalidKeyLength(len)),
    }
}

fn cbc_encrypt<C>(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, SigningError>
where
    C: BlockCipher + BlockEncryptMut,
    cbc::Encryptor<C>: KeyIvInit + BlockEncryptMut,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, &ZERO_IV)
        .map_err(|_| SigningError::InvalidKeyLength(key.len()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, SigningError>
where
    C: BlockCipher + BlockDecryptMut,
    cbc::Decryptor<C>: KeyIvInit + BlockDecryptMut,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, &ZERO_IV)
        .map_err(|_| SigningError::InvalidKeyLength(key.len()))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SigningError::InvalidCiphertext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_128: &[u8] = b"1234567890123456";
    const KEY_256: &[u8] = b"12345678901234561234567890123456";

    #[test]
    fn test_round_trip_across_block_boundaries() {
        let source: Vec<u8> = (0u8..64).map(|i| b'a' + (i % 26)).collect();

        for len in 1..=source.len() {
            let plaintext = &source[..len];
            for key in [KEY_128, b"123456789012345678901234".as_slice(), KEY_256] {
                let ciphertext = encrypt(plaintext, key).unwrap();
                assert_eq!(ciphertext.len(), (len / 16 + 1) * 16);
                assert_eq!(decrypt(&ciphertext, key).unwrap(), plaintext);
            }
        }
    }

    #[test]
    fn test_full_block_gets_extra_padding_block() {
        let ciphertext = encrypt(b"0123456789abcdef", KEY_128).unwrap();
        assert_eq!(ciphertext.len(), 32);
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        assert!(matches!(
            encrypt(b"", KEY_128),
            Err(SigningError::EmptyPlaintext)
        ));
    }

    #[test]
    fn test_bad_key_length_rejected() {
        assert!(matches!(
            encrypt(b"data", b"short"),
            Err(SigningError::InvalidKeyLength(5))
        ));
        assert!(matches!(
            decrypt(&[0u8; 16], b"short"),
            Err(SigningError::InvalidKeyLength(5))
        ));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let ciphertext = encrypt(b"AGENT01REQ-0001", KEY_128).unwrap();
        assert!(matches!(
            decrypt(&ciphertext[..15], KEY_128),
            Err(SigningError::InvalidCiphertext)
        ));
        assert!(matches!(
            decrypt(&[], KEY_128),
            Err(SigningError::InvalidCiphertext)
        ));
    }

    #[test]
    fn test_wrong_key_does_not_round_trip() {
        let ciphertext = encrypt(b"AGENT01REQ-0001", KEY_128).unwrap();
        match decrypt(&ciphertext, b"6543210987654321") {
            Ok(plaintext) => assert_ne!(plaintext, b"AGENT01REQ-0001"),
            Err(e) => assert!(matches!(e, SigningError::InvalidCiphertext)),
        }
    }
}

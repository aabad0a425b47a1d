//! Stable identifiers shared between the local cache, the remote sheet and
//! the files mirrored to cloud storage.
//!
//! Ids are the first 12 base-62 digits of a SHA-256 digest read as a
//! big-endian integer. File names combine a short name tag with the id of
//! the candidate's document number, e.g. `jcperez-4fQ0x9Lm2bZa.pdf`.

use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use talentos_match::normalize;
use url::Url;
use uuid::Uuid;

use crate::models::Profile;

/// Number of base-62 digits kept from a digest.
pub const ID_LEN: usize = 12;

const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Base-62 representation of a big-endian unsigned integer.
pub fn base62(bytes: &[u8]) -> String {
    let mut number: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if number.is_empty() {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while !number.is_empty() {
        // Long division of the byte string by 62.
        let mut remainder: u32 = 0;
        let mut quotient = Vec::with_capacity(number.len());
        for &byte in &number {
            let acc = remainder * 256 + u32::from(byte);
            let q = acc / 62;
            remainder = acc % 62;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(BASE62_ALPHABET[remainder as usize] as char);
        number = quotient;
    }

    digits.iter().rev().collect()
}

fn hash_id(chunks: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(*chunk);
    }
    base62(&hasher.finalize()).chars().take(ID_LEN).collect()
}

/// Id derived from an identifier string, ignoring all whitespace.
///
/// `"123 456"` and `"123456"` yield the same id.
pub fn deterministic_id(identifier: &str) -> String {
    let compact: String = identifier.chars().filter(|c| !c.is_whitespace()).collect();
    hash_id(&[compact.as_bytes()])
}

/// Fresh id from the current time in nanoseconds and 8 random bytes.
pub fn random_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let uuid = Uuid::new_v4();
    let random = &uuid.as_bytes()[..8];
    hash_id(&[nanos.to_string().as_bytes(), random])
}

/// Short name tag: initials of the given names followed by the last name.
///
/// `"Juan Carlos Pérez"` → `"jcperez"`.
pub fn name_id(full_name: &str) -> String {
    let folded = normalize(full_name);
    let tokens: Vec<&str> = folded.split(' ').filter(|t| !t.is_empty()).collect();
    let Some((last, given)) = tokens.split_last() else {
        return String::new();
    };

    let mut id: String = given.iter().filter_map(|t| t.chars().next()).collect();
    id.push_str(last);
    id
}

/// `{name_id}-{doc_id}{extension}`; a missing leading dot is added.
pub fn file_name(doc_id: &str, name_id: &str, extension: &str) -> String {
    let extension = extension.trim();
    if extension.is_empty() || extension.starts_with('.') {
        format!("{name_id}-{doc_id}{extension}")
    } else {
        format!("{name_id}-{doc_id}.{extension}")
    }
}

/// Key identifying a candidate across imports: name tag plus document id.
pub fn profile_key(profile: &Profile) -> String {
    format!(
        "{}-{}",
        name_id(&profile.full_name),
        deterministic_id(&profile.id_document_number)
    )
}

/// Resume and photo file names for a profile.
pub fn profile_file_names(profile: &Profile, resume_extension: &str) -> (String, String) {
    let name = name_id(&profile.full_name);
    let doc = deterministic_id(&profile.id_document_number);
    (
        file_name(&doc, &name, resume_extension),
        file_name(&doc, &name, ".jpg"),
    )
}

/// Extension of a file name or URL path, with its leading dot.
///
/// A URL without a path has no extension; its host is not a file name.
pub fn extension_of(name: &str) -> String {
    match Url::parse(name.trim()) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(file_extension)
            .unwrap_or_default(),
        Err(_) => {
            let path = name.split(['?', '#']).next().unwrap_or_default();
            file_extension(path.rsplit('/').next().unwrap_or_default())
        }
    }
}

fn file_extension(file: &str) -> String {
    match file.rfind('.') {
        Some(i) if i > 0 && i + 1 < file.len() => file[i..].to_lowercase(),
        _ => String::new(),
    }
}

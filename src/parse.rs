use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::types::KeyRecord;

/// Parses `gpg --list-keys --with-colons` or `--list-secret-keys --with-colons`
/// output into key records, in listing order.
pub fn parse_key_records(output: &str) -> Result<Vec<KeyRecord>> {
    let mut records = Vec::new();
    let mut current: Option<RecordBuilder> = None;

    for line in output.lines() {
        let fields: Vec<&str> = line.split(':').collect();

        match fields[0] {
            "sec" | "pub" => {
                if let Some(builder) = current.take() {
                    push_built(&mut records, builder);
                }
                current = Some(RecordBuilder::from_primary_fields(&fields));
            }
            "fpr" => {
                if let Some(ref mut builder) = current
                    && builder.fingerprint.is_none()
                    && !builder.in_subkey
                    && fields.len() > 9
                    && !fields[9].is_empty()
                {
                    builder.fingerprint = Some(fields[9].to_string());
                }
            }
            "uid" => {
                if let Some(ref mut builder) = current
                    && builder.uid.is_none()
                    && fields.len() > 9
                {
                    builder.uid = Some(unescape(fields[9]));
                }
            }
            "ssb" | "sub" => {
                if let Some(ref mut builder) = current {
                    builder.in_subkey = true;
                }
            }
            "grp" | "uat" | "rev" | "tru" | "sig" => {
                debug!(record_type = fields[0], "skipping unhandled GPG record type");
            }
            _ if !fields[0].is_empty() => {
                debug!(record_type = fields[0], "skipping unknown GPG record type");
            }
            _ => {}
        }
    }

    if let Some(builder) = current {
        push_built(&mut records, builder);
    }

    Ok(records)
}

fn push_built(records: &mut Vec<KeyRecord>, builder: RecordBuilder) {
    match builder.build() {
        Some(record) => records.push(record),
        None => debug!("skipping key: no fingerprint or key ID"),
    }
}

/// Splits a user ID of the form `Name (comment) <email>` into name and email.
pub fn split_uid(uid: &str) -> (String, String) {
    if let Some(start) = uid.rfind('<')
        && let Some(len) = uid[start..].find('>')
    {
        let name = uid[..start].trim().to_string();
        let email = uid[start + 1..start + len].trim().to_string();
        return (name, email);
    }

    if uid.contains('@') && !uid.contains(char::is_whitespace) {
        (String::new(), uid.to_string())
    } else {
        (uid.trim().to_string(), String::new())
    }
}

/// Undoes gpg's `\xHH` escaping of colons and control characters in colon output.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\'
            && bytes.get(i + 1) == Some(&b'x')
            && let Some(hex) = field.get(i + 2..i + 4)
            && let Ok(b) = u8::from_str_radix(hex, 16)
        {
            out.push(b);
            i += 4;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.date_naive())
}

#[derive(Default)]
struct RecordBuilder {
    keyid: Option<String>,
    fingerprint: Option<String>,
    uid: Option<String>,
    created: Option<NaiveDate>,
    in_subkey: bool,
}

impl RecordBuilder {
    fn from_primary_fields(fields: &[&str]) -> Self {
        let mut builder = Self::default();

        if let Some(keyid) = fields.get(4).filter(|s| !s.is_empty()) {
            builder.keyid = Some(keyid.to_string());
        }

        if let Some(created) = fields.get(5) {
            builder.created = parse_timestamp(created);
        }

        builder
    }

    fn build(self) -> Option<KeyRecord> {
        let key = self.fingerprint.or(self.keyid)?;
        let (name, email) = self.uid.as_deref().map(split_uid).unwrap_or_default();

        Some(KeyRecord {
            name,
            email,
            key,
            created: self.created,
        })
    }
}

use thiserror::Error;

/// Characters accepted as byte-group separators
const DELIMITERS: [char; 3] = [':', '-', '.'];

/// Length of an OUI lookup key in hex characters
pub const OUI_KEY_LEN: usize = 6;

/// Length of a bare (undelimited) EUI-48 address
const BARE_MAC_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacError {
    #[error("empty MAC address")]
    Empty,

    #[error("invalid hex group {group:?} in MAC address {mac:?}")]
    InvalidGroup { mac: String, group: String },

    #[error("undelimited MAC address {0:?} must be exactly 12 hex digits")]
    BareLength(String),

    #[error("MAC address {0:?} is too short to contain an OUI")]
    TooShort(String),
}

/// Normalize MAC text into the 6-character uppercase OUI key used by the
/// vendor table.
///
/// Delimited input (`:`, `-` or `.`) may use 1- or 2-digit byte groups, or
/// 4-digit groups in Cisco dotted notation. Undelimited input must be a full
/// 12-digit address: short groups cannot be recovered without separators.
pub fn normalize_mac(mac: &str) -> Result<String, MacError> {
    let mac = mac.trim();
    if mac.is_empty() {
        return Err(MacError::Empty);
    }

    let digits = if mac.contains(DELIMITERS) {
        let mut digits = String::with_capacity(BARE_MAC_LEN);
        for group in mac.split(DELIMITERS) {
            if !is_valid_group(group) {
                return Err(MacError::InvalidGroup {
                    mac: mac.to_string(),
                    group: group.to_string(),
                });
            }
            if group.len() == 1 {
                digits.push('0');
            }
            digits.push_str(group);
        }
        digits
    } else {
        if mac.len() != BARE_MAC_LEN || !is_hex(mac) {
            return Err(MacError::BareLength(mac.to_string()));
        }
        mac.to_string()
    };

    if digits.len() < OUI_KEY_LEN {
        return Err(MacError::TooShort(mac.to_string()));
    }

    Ok(digits[..OUI_KEY_LEN].to_ascii_uppercase())
}

fn is_valid_group(group: &str) -> bool {
    matches!(group.len(), 1 | 2 | 4) && is_hex(group)
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

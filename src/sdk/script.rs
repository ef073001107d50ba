//! Pure byte-level builders for the scripts a claim transaction carries.
//!
//! Every spend of the deadman contract needs two pieces: the unlocking
//! (signature) script placed in the input, and the P2PK locking script
//! placed in the output. Both are plain length-prefixed concatenation,
//! consolidated here so no caller re-implements the varint rule.

/// Bitcoin-style variable-length integer.
///
/// ```text
/// n < 0xfd              -> [n]
/// n < 0x1_0000          -> [0xfd, 2 LE bytes]
/// n < 0x1_0000_0000     -> [0xfe, 4 LE bytes]
/// otherwise             -> [0xff, 8 LE bytes]
/// ```
pub fn encode_varint(n: u64) -> Vec<u8> {
    if n < 0xfd {
        vec![n as u8]
    } else if n < 0x1_0000 {
        let mut v = Vec::with_capacity(3);
        v.push(0xfd);
        v.extend_from_slice(&(n as u16).to_le_bytes());
        v
    } else if n < 0x1_0000_0000 {
        let mut v = Vec::with_capacity(5);
        v.push(0xfe);
        v.extend_from_slice(&(n as u32).to_le_bytes());
        v
    } else {
        let mut v = Vec::with_capacity(9);
        v.push(0xff);
        v.extend_from_slice(&n.to_le_bytes());
        v
    }
}

/// Decode a varint from the front of `bytes`. Returns the value and the
/// number of bytes consumed, or None if the slice is too short.
pub fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let first = *bytes.first()?;
    match first {
        0xfd => {
            let le: [u8; 2] = bytes.get(1..3)?.try_into().ok()?;
            Some((u16::from_le_bytes(le) as u64, 3))
        }
        0xfe => {
            let le: [u8; 4] = bytes.get(1..5)?.try_into().ok()?;
            Some((u32::from_le_bytes(le) as u64, 5))
        }
        0xff => {
            let le: [u8; 8] = bytes.get(1..9)?.try_into().ok()?;
            Some((u64::from_le_bytes(le), 9))
        }
        n => Some((n as u64, 1)),
    }
}

fn push_field(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&encode_varint(data.len() as u64));
    buf.extend_from_slice(data);
}

/// Assemble an unlocking (signature) script: each field prefixed with the
/// varint of its length.
///
/// ```text
/// varint(|sig|) sig varint(|second|) second [varint(|redeem|) redeem]
/// ```
///
/// `second_field` is either the spender's public key (redeem-script spends)
/// or a single selector byte naming a contract entry point.
pub fn unlocking_script(
    signature: &[u8],
    second_field: &[u8],
    redeem_script: Option<&[u8]>,
) -> Vec<u8> {
    let mut script = Vec::with_capacity(2 + signature.len() + second_field.len());
    push_field(&mut script, signature);
    push_field(&mut script, second_field);
    if let Some(redeem) = redeem_script {
        push_field(&mut script, redeem);
    }
    script
}

/// Unlocking script for a contract entry-point spend: `<sig> <selector>`.
pub fn claim_sig_script(signature: &[u8], selector: u8) -> Vec<u8> {
    unlocking_script(signature, &[selector], None)
}

/// Unlocking script for a full redeem-script spend:
/// `<sig> <pubkey> <redeem_script>`.
pub fn redeem_sig_script(signature: &[u8], pubkey: &[u8], redeem_script: &[u8]) -> Vec<u8> {
    unlocking_script(signature, pubkey, Some(redeem_script))
}

/// P2PK locking script for a 32-byte x-only public key:
/// `OP_PUSHBYTES_32 <pubkey> OP_CHECKSIG` — always 34 bytes.
pub fn p2pk_script(pubkey: &[u8; 32]) -> Vec<u8> {
    let mut script = Vec::with_capacity(34);
    script.push(0x20);
    script.extend_from_slice(pubkey);
    script.push(0xac);
    script
}

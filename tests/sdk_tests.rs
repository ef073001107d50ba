//! Tests for the byte-level SDK — varint encoding, unlocking-script layout,
//! transaction assembly, descriptor handling, and the signing seam.

use kaspa_addresses::Prefix;
use kaspa_deadman_lab::sdk::contract::{
    claim_window, AbiEntry, AbiInput, ContractDescriptor, CLAIM_SELECTOR,
};
use kaspa_deadman_lab::sdk::error::DeadmanError;
use kaspa_deadman_lab::sdk::script::{
    claim_sig_script, decode_varint, encode_varint, p2pk_script, redeem_sig_script,
    unlocking_script,
};
use kaspa_deadman_lab::sdk::signer::{SchnorrSigner, ScriptSigner};
use kaspa_deadman_lab::sdk::tx::{
    build_claim_tx, build_send_tx, UtxoRef, SUBNETWORK_ID_NATIVE,
};
use kaspa_deadman_lab::*;
use serde_json::{json, Value};

fn mock_utxo(amount: u64) -> UtxoRef {
    UtxoRef {
        transaction_id: "aa".repeat(32),
        index: 0,
        amount,
        script_public_key: vec![0x20; 34],
        block_daa_score: 1000,
    }
}

// ---------------------------------------------------------------------------
// Varint encoding
// ---------------------------------------------------------------------------

mod varint {
    use super::*;

    #[test]
    fn single_byte_below_fd() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(1), vec![0x01]);
        assert_eq!(encode_varint(0xfc), vec![0xfc]);
    }

    #[test]
    fn two_byte_range_uses_fd_marker() {
        assert_eq!(encode_varint(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode_varint(0x0100), vec![0xfd, 0x00, 0x01]);
        assert_eq!(encode_varint(0xffff), vec![0xfd, 0xff, 0xff]);
    }

    #[test]
    fn four_byte_range_uses_fe_marker() {
        assert_eq!(encode_varint(0x1_0000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(
            encode_varint(0xffff_ffff),
            vec![0xfe, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn eight_byte_range_uses_ff_marker() {
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(encode_varint(u64::MAX), {
            let mut v = vec![0xff];
            v.extend_from_slice(&u64::MAX.to_le_bytes());
            v
        });
    }

    #[test]
    fn round_trips_boundary_values() {
        for n in [
            0u64,
            1,
            0xfc,
            0xfd,
            0xffff,
            0x1_0000,
            0xffff_ffff,
            0x1_0000_0000,
            u64::MAX,
        ] {
            let encoded = encode_varint(n);
            let (decoded, consumed) = decode_varint(&encoded).expect("decodable");
            assert_eq!(decoded, n);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert!(decode_varint(&[]).is_none());
        assert!(decode_varint(&[0xfd, 0x01]).is_none());
        assert!(decode_varint(&[0xfe, 0x01, 0x02]).is_none());
        assert!(decode_varint(&[0xff, 0x01]).is_none());
    }
}

// ---------------------------------------------------------------------------
// Unlocking scripts
// ---------------------------------------------------------------------------

mod unlocking {
    use super::*;

    #[test]
    fn claim_script_layout_for_64_byte_signature() {
        let sig = [0xab; 64];
        let script = claim_sig_script(&sig, 0x01);
        // varint(64) = 0x40, then the signature, then varint(1) + selector.
        let expected_hex = format!("40{}0101", hex::encode(sig));
        assert_eq!(hex::encode(&script), expected_hex);
        assert_eq!(script.len(), 1 + 64 + 1 + 1);
    }

    #[test]
    fn selector_byte_is_last() {
        let script = claim_sig_script(&[0xab; 64], 0x03);
        assert_eq!(*script.last().unwrap(), 0x03);
    }

    #[test]
    fn redeem_script_spend_carries_three_fields() {
        let sig = [0x11; 64];
        let pubkey = [0x22; 32];
        let redeem = [0x33; 5];
        let script = redeem_sig_script(&sig, &pubkey, &redeem);

        let (sig_len, consumed) = decode_varint(&script).unwrap();
        assert_eq!(sig_len, 64);
        let after_sig = &script[consumed + 64..];
        let (pk_len, consumed) = decode_varint(after_sig).unwrap();
        assert_eq!(pk_len, 32);
        let after_pk = &after_sig[consumed + 32..];
        let (redeem_len, consumed) = decode_varint(after_pk).unwrap();
        assert_eq!(redeem_len, 5);
        assert_eq!(after_pk[consumed..], redeem);
    }

    #[test]
    fn large_field_gets_multi_byte_prefix() {
        let big = vec![0x00; 0x0200];
        let script = unlocking_script(&big, &[0x01], None);
        assert_eq!(&script[..3], &[0xfd, 0x00, 0x02]);
    }

    #[test]
    fn p2pk_script_is_34_bytes() {
        let pk = [0x7f; 32];
        let script = p2pk_script(&pk);
        assert_eq!(script.len(), 34);
        assert_eq!(script[0], 0x20);
        assert_eq!(&script[1..33], &pk);
        assert_eq!(script[33], 0xac);
    }
}

// ---------------------------------------------------------------------------
// Transaction assembly
// ---------------------------------------------------------------------------

mod assembly {
    use super::*;

    #[test]
    fn claim_deducts_flat_fee() {
        let utxo = mock_utxo(100_000_000);
        let tx = build_claim_tx(&utxo, &[0x01], &[0x02], 1_000, 0).unwrap();
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].value, "99999000");
    }

    #[test]
    fn claim_rejects_utxo_below_fee() {
        let utxo = mock_utxo(500);
        let err = build_claim_tx(&utxo, &[0x01], &[0x02], 1_000, 0).unwrap_err();
        match err {
            DeadmanError::InsufficientFunds { needed, available } => {
                assert_eq!(needed, 1_001);
                assert_eq!(available, 500);
            }
            other => panic!("expected InsufficientFunds, got {other}"),
        }
    }

    #[test]
    fn claim_rejects_utxo_equal_to_fee() {
        let utxo = mock_utxo(1_000);
        assert!(build_claim_tx(&utxo, &[0x01], &[0x02], 1_000, 0).is_err());
    }

    #[test]
    fn send_requires_value_plus_fee() {
        let utxo = mock_utxo(10_000);
        let err = build_send_tx(&utxo, &[0x01], &[0x02], &[0x03], 9_500, 1_000).unwrap_err();
        match err {
            DeadmanError::InsufficientFunds { needed, available } => {
                assert_eq!(needed, 10_500);
                assert_eq!(available, 10_000);
            }
            other => panic!("expected InsufficientFunds, got {other}"),
        }
    }

    #[test]
    fn send_returns_remainder_as_change() {
        // 1 KAS UTXO, 0.01 KAS payment: everything above value + fee must
        // come back to the sender, not be burned as fee.
        let utxo = mock_utxo(100_000_000);
        let tx = build_send_tx(&utxo, &[0x01], &[0x02], &[0x03], 1_000_000, 1_000).unwrap();

        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, "1000000");
        assert_eq!(tx.outputs[0].script_public_key.script, "02");
        assert_eq!(tx.outputs[1].value, "98999000");
        assert_eq!(tx.outputs[1].script_public_key.script, "03");

        let total_out: u64 = tx
            .outputs
            .iter()
            .map(|o| o.value.parse::<u64>().unwrap())
            .sum();
        assert_eq!(utxo.amount - total_out, 1_000);
    }

    #[test]
    fn exact_send_emits_no_change_output() {
        let utxo = mock_utxo(10_000);
        let tx = build_send_tx(&utxo, &[0x01], &[0x02], &[0x03], 9_000, 1_000).unwrap();
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].value, "9000");
    }

    #[test]
    fn wire_json_matches_node_schema() {
        let utxo = mock_utxo(100_000_000);
        let tx = build_claim_tx(&utxo, &[0xde, 0xad], &[0xbe, 0xef], 1_000, 0).unwrap();
        let value: Value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["version"], 0);
        assert_eq!(value["lockTime"], 0);
        assert_eq!(value["subnetworkId"], SUBNETWORK_ID_NATIVE);
        assert_eq!(value["gas"], "0");
        assert_eq!(value["payload"], "");

        let input = &value["inputs"][0];
        assert_eq!(input["previousOutpoint"]["transactionId"], "aa".repeat(32));
        assert_eq!(input["previousOutpoint"]["index"], 0);
        assert_eq!(input["signatureScript"], "dead");
        assert_eq!(input["sequence"], 0);

        let output = &value["outputs"][0];
        assert_eq!(output["value"], "99999000");
        assert_eq!(output["scriptPublicKey"]["version"], 0);
        assert_eq!(output["scriptPublicKey"]["script"], "beef");
    }

    #[test]
    fn utxo_parses_indexer_entry_with_string_amount() {
        let entry = json!({
            "outpoint": { "transactionId": "ab".repeat(32), "index": 2 },
            "utxoEntry": {
                "amount": "123456789",
                "scriptPublicKey": { "scriptPublicKey": "20aa20ac" },
                "blockDaaScore": "7777"
            }
        });
        let utxo = UtxoRef::from_entry(&entry).unwrap();
        assert_eq!(utxo.transaction_id, "ab".repeat(32));
        assert_eq!(utxo.index, 2);
        assert_eq!(utxo.amount, 123_456_789);
        assert_eq!(utxo.script_public_key, vec![0x20, 0xaa, 0x20, 0xac]);
        assert_eq!(utxo.block_daa_score, 7_777);
    }

    #[test]
    fn utxo_parses_node_entry_with_numeric_amount() {
        let entry = json!({
            "outpoint": { "transactionId": "cd".repeat(32), "index": 0 },
            "utxoEntry": {
                "amount": 42_u64,
                "scriptPublicKey": { "script": "aa55" },
                "blockDaaScore": 9
            }
        });
        let utxo = UtxoRef::from_entry(&entry).unwrap();
        assert_eq!(utxo.amount, 42);
        assert_eq!(utxo.script_public_key, vec![0xaa, 0x55]);
    }

    #[test]
    fn utxo_entry_missing_outpoint_is_an_error() {
        let entry = json!({ "utxoEntry": { "amount": 1 } });
        assert!(UtxoRef::from_entry(&entry).is_err());
    }

    #[test]
    fn kas_amounts_convert_to_sompi() {
        assert_eq!(kas_to_sompi(1.0).unwrap(), 100_000_000);
        assert_eq!(kas_to_sompi(0.00000001).unwrap(), 1);
        assert_eq!(kas_to_sompi(0.5).unwrap(), 50_000_000);
    }

    #[test]
    fn bad_kas_amounts_are_rejected() {
        // None of these may silently round to a zero-value output.
        assert!(kas_to_sompi(0.0).is_err());
        assert!(kas_to_sompi(-1.0).is_err());
        assert!(kas_to_sompi(f64::NAN).is_err());
        assert!(kas_to_sompi(f64::INFINITY).is_err());
    }
}

// ---------------------------------------------------------------------------
// Submission response handling
// ---------------------------------------------------------------------------

mod submission {
    use super::*;
    use kaspa_deadman_lab::rpc::submit::parse_submit_response;
    use reqwest::StatusCode;

    #[test]
    fn dust_rejection_is_its_own_error() {
        let body = r#"{"error": {"message": "transaction output is DUST"}}"#;
        let err = parse_submit_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, DeadmanError::DustRejected));
        // Dust wins even when the proxy also reports a server error.
        let err = parse_submit_response(StatusCode::INTERNAL_SERVER_ERROR, "dust").unwrap_err();
        assert!(matches!(err, DeadmanError::DustRejected));
    }

    #[test]
    fn non_2xx_status_fails_with_body() {
        let err = parse_submit_response(StatusCode::BAD_GATEWAY, "node down").unwrap_err();
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("node down"));
    }

    #[test]
    fn error_member_fails_even_on_200() {
        let body = r#"{"error": {"message": "orphan transaction"}}"#;
        let err = parse_submit_response(StatusCode::OK, body).unwrap_err();
        assert!(err.to_string().contains("orphan"));
    }

    #[test]
    fn extracts_id_from_jsonrpc_result() {
        let body = r#"{"result": {"transactionId": "abc123"}}"#;
        let id = parse_submit_response(StatusCode::OK, body).unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn extracts_top_level_id() {
        let body = r#"{"transactionId": "def456"}"#;
        let id = parse_submit_response(StatusCode::OK, body).unwrap();
        assert_eq!(id, "def456");
    }

    #[test]
    fn acknowledgement_without_id_still_succeeds() {
        let id = parse_submit_response(StatusCode::OK, r#"{"result": null}"#).unwrap();
        assert_eq!(id, "check explorer");
    }

    #[test]
    fn malformed_body_is_a_submit_error() {
        assert!(parse_submit_response(StatusCode::OK, "not json").is_err());
    }
}

// ---------------------------------------------------------------------------
// Contract descriptor
// ---------------------------------------------------------------------------

mod descriptor {
    use super::*;

    fn deadman_descriptor() -> ContractDescriptor {
        ContractDescriptor {
            contract_name: "Deadman".to_string(),
            script: vec![0x51, 0x52, 0x53, 0x87],
            abi: vec![
                AbiEntry {
                    name: "heartbeat".to_string(),
                    inputs: vec![AbiInput {
                        name: "ownerSig".to_string(),
                        type_name: "sig".to_string(),
                    }],
                },
                AbiEntry {
                    name: "claim".to_string(),
                    inputs: vec![AbiInput {
                        name: "beneficiarySig".to_string(),
                        type_name: "sig".to_string(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn parses_compiled_json() {
        let json = r#"{
            "contract_name": "Deadman",
            "script": [81, 82, 83],
            "abi": [{ "name": "claim", "inputs": [] }]
        }"#;
        let d: ContractDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.contract_name, "Deadman");
        assert_eq!(d.script, vec![81, 82, 83]);
        assert_eq!(d.abi.len(), 1);
    }

    #[test]
    fn selector_is_one_based_abi_position() {
        let d = deadman_descriptor();
        assert_eq!(d.selector("heartbeat"), Some(1));
        assert_eq!(d.selector("claim"), Some(2));
        assert_eq!(d.selector("missing"), None);
    }

    #[test]
    fn claim_selector_falls_back_without_abi() {
        let d = ContractDescriptor::from_script_hex("51528793").unwrap();
        assert_eq!(d.selector("claim"), Some(CLAIM_SELECTOR));
        assert_eq!(d.selector("other"), None);
    }

    #[test]
    fn entrypoints_render_name_and_inputs() {
        let d = deadman_descriptor();
        let eps = d.entrypoints();
        assert_eq!(eps[0], "heartbeat(ownerSig:sig)");
        assert_eq!(eps[1], "claim(beneficiarySig:sig)");
    }

    #[test]
    fn from_script_hex_rejects_garbage() {
        assert!(ContractDescriptor::from_script_hex("zz").is_err());
    }

    #[test]
    fn p2sh_address_is_testnet_script_hash() {
        let d = deadman_descriptor();
        let addr = d.p2sh_address(Prefix::Testnet).unwrap().to_string();
        assert!(addr.starts_with("kaspatest:"));
        // ScriptHash version encodes with a 'p' after the prefix.
        assert!(addr["kaspatest:".len()..].starts_with('p'));
    }

    #[test]
    fn empty_script_cannot_derive_an_address() {
        let d = ContractDescriptor {
            contract_name: "empty".to_string(),
            script: Vec::new(),
            abi: Vec::new(),
        };
        assert!(d.p2sh_address(Prefix::Testnet).is_err());
    }

    #[test]
    fn claim_window_arithmetic() {
        let w = claim_window(1_000, 1_500, 600);
        assert_eq!(w.age, 500);
        assert!(!w.claimable);

        let w = claim_window(1_000, 1_600, 600);
        assert_eq!(w.age, 600);
        assert!(w.claimable);

        // UTXO newer than the tip (indexer lag) never underflows.
        let w = claim_window(2_000, 1_500, 600);
        assert_eq!(w.age, 0);
        assert!(!w.claimable);
    }
}

// ---------------------------------------------------------------------------
// Signing seam
// ---------------------------------------------------------------------------

mod signing {
    use super::*;

    struct FakeSigner {
        pubkey: [u8; 32],
    }

    impl ScriptSigner for FakeSigner {
        fn sign_script_hash(&self, _script: &[u8]) -> Result<Vec<u8>, DeadmanError> {
            Ok(vec![0xcc; 64])
        }

        fn x_only_pubkey(&self) -> [u8; 32] {
            self.pubkey
        }
    }

    #[test]
    fn schnorr_signer_produces_64_byte_signatures() {
        let (keypair, pubkey) = generate_keypair();
        let signer = SchnorrSigner::new(keypair);
        assert_eq!(signer.x_only_pubkey(), pubkey);

        let sig = signer.sign_script_hash(b"some locking script").unwrap();
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn from_hex_round_trips_a_generated_key() {
        let (keypair, pubkey) = generate_keypair();
        let hex_key = hex::encode(keypair.secret_bytes());
        let signer = SchnorrSigner::from_hex(&hex_key).unwrap();
        assert_eq!(signer.x_only_pubkey(), pubkey);
    }

    #[test]
    fn from_hex_rejects_bad_keys() {
        assert!(SchnorrSigner::from_hex("nothex").is_err());
        assert!(SchnorrSigner::from_hex("abcd").is_err());
        // All-zero is not a valid secp256k1 secret key.
        assert!(SchnorrSigner::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn fake_signer_drives_claim_assembly() {
        let signer = FakeSigner { pubkey: [0x44; 32] };
        let sig = signer.sign_script_hash(&[0x51]).unwrap();
        let sig_script = claim_sig_script(&sig, CLAIM_SELECTOR);
        let output_script = p2pk_script(&signer.x_only_pubkey());

        let utxo = mock_utxo(5_000_000);
        let tx = build_claim_tx(&utxo, &sig_script, &output_script, 1_000, 0).unwrap();

        let expected_sig_hex = format!("40{}0101", "cc".repeat(64));
        assert_eq!(tx.inputs[0].signature_script, expected_sig_hex);
        assert_eq!(
            tx.outputs[0].script_public_key.script,
            format!("20{}ac", "44".repeat(32))
        );
        assert_eq!(tx.outputs[0].value, "4999000");
    }

    #[test]
    fn signer_address_uses_pubkey_version() {
        let signer = FakeSigner { pubkey: [0x44; 32] };
        let addr = signer.address(Prefix::Testnet);
        assert!(addr.to_string().starts_with("kaspatest:q"));
        assert_eq!(addr, pubkey_address(Prefix::Testnet, &[0x44; 32]));
    }
}

//! Integration tests for the openpgp-stack library.
//!
//! These tests drive the writer stack and the reader engines end to end:
//! encryption, signing, detached signatures, armor and the helper protocol.

use std::cell::RefCell;

use openpgp_stack::pgp::types::CompressionAlgorithm;
use openpgp_stack::{
    // Streams and armor
    armor, dearmor, ArmorKind, IoReader, IoWriter,
    // Certificates
    Cert, CipherSuite, Recipient, Signer, StandardPolicy,
    // Engines and helpers
    Callbacks, DecryptionHelper, Decryptor, DetachedVerifier, KeyringHelper, MessageLayer,
    Verifier, WriterStack,
    // One-shot functions
    decrypt_file_for, decrypt_for, decrypt_with_password, encrypt, encrypt_file_for, encrypt_for,
    sign, sign_file, verify_detached_file, verify_detached_with_certs, verify_with_certs,
    // Errors
    Error, Status,
};

const TEST_PASSWORD: &str = "test-password-123";
const HELLO: &[u8] = b"Hello world!";

/// Helper to generate a password protected test certificate.
fn generate_cert(uid: &str) -> Cert {
    let _ = pretty_env_logger::try_init();
    Cert::generate(TEST_PASSWORD, &[uid], CipherSuite::Cv25519).unwrap()
}

fn recipients_of(cert: &Cert) -> Vec<Recipient> {
    Recipient::all_for(cert, &StandardPolicy::new(), None).unwrap()
}

fn signers_of(cert: &Cert) -> Vec<Signer> {
    Signer::all_for(cert, &StandardPolicy::new(), None, TEST_PASSWORD).unwrap()
}

// =============================================================================
// Encryption Round Trips
// =============================================================================

mod encryption {
    use super::*;

    #[test]
    fn test_password_scenario() {
        let _ = pretty_env_logger::try_init();
        let mut stack = WriterStack::new(Vec::new())
            .push_encrypt(&["p"], &[], 0)
            .unwrap()
            .push_literal();
        stack.write_all(HELLO).unwrap();
        let ciphertext = stack.finalize().unwrap();

        assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), HELLO);

        match decrypt_with_password(&ciphertext, "q") {
            Err(Error::InvalidPassword) | Err(Error::InvalidSessionKey) => {}
            other => panic!("expected a password failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_any_password_decrypts() {
        let ciphertext = encrypt(HELLO, &[], &["p", "f"], &[], true).unwrap();
        assert!(ciphertext.starts_with(b"-----BEGIN PGP MESSAGE-----"));

        assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), HELLO);
        assert_eq!(decrypt_with_password(&ciphertext, "f").unwrap(), HELLO);
    }

    #[test]
    fn test_any_recipient_decrypts() {
        let alice = generate_cert("Alice <alice@example.com>");
        let bob = generate_cert("Bob <bob@example.com>");
        let policy = StandardPolicy::new();

        let ciphertext = encrypt_for(
            HELLO,
            &[alice.strip_secret(), bob.strip_secret()],
            &["p"],
            &policy,
            None,
            false,
        )
        .unwrap();

        assert_eq!(decrypt_for(&ciphertext, &alice, TEST_PASSWORD).unwrap(), HELLO);
        assert_eq!(decrypt_for(&ciphertext, &bob, TEST_PASSWORD).unwrap(), HELLO);
        assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), HELLO);
    }

    #[test]
    fn test_not_a_recipient() {
        let alice = generate_cert("Alice <alice@example.com>");
        let eve = generate_cert("Eve <eve@example.com>");

        let ciphertext = encrypt(HELLO, &recipients_of(&alice), &[], &[], false).unwrap();
        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(vec![eve], &policy, None).with_key_password(TEST_PASSWORD);

        assert!(matches!(
            Decryptor::from_bytes(&policy, &ciphertext, helper, None),
            Err(Error::MissingSessionKey(_))
        ));
    }

    #[test]
    fn test_wrong_key_password() {
        let alice = generate_cert("Alice <alice@example.com>");
        let ciphertext = encrypt(HELLO, &recipients_of(&alice), &[], &[], false).unwrap();

        assert!(matches!(
            decrypt_for(&ciphertext, &alice, "not the password"),
            Err(Error::InvalidPassword)
        ));
    }

    #[test]
    fn test_decrypt_from_armored_reader() {
        let alice = generate_cert("Alice <alice@example.com>");
        let ciphertext = encrypt(HELLO, &recipients_of(&alice), &["p"], &[], true).unwrap();

        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(Vec::new(), &policy, None).with_password("p");
        let source = IoReader::from_bytes(ciphertext);
        let mut reader = Decryptor::from_reader(&policy, source, helper, None).unwrap();
        assert_eq!(reader.structure().shape(), vec![2]);
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
    }

    #[test]
    fn test_explicit_cipher() {
        let mut stack = WriterStack::new(Vec::new())
            .push_encrypt(&["p"], &[], 7)
            .unwrap()
            .push_literal();
        stack.write_all(HELLO).unwrap();
        let ciphertext = stack.finalize().unwrap();
        assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), HELLO);

        assert!(WriterStack::new(Vec::new()).push_encrypt(&["p"], &[], 200).is_err());
    }

    #[test]
    fn test_stack_over_io_writer() {
        let mut stack = WriterStack::new(IoWriter::memory())
            .push_encrypt(&["p"], &[], 0)
            .unwrap()
            .push_literal();
        let mut source = IoReader::from_slice(HELLO);
        source.copy_to(&mut stack, None).unwrap();
        let ciphertext = stack.finalize().unwrap().into_bytes().unwrap();

        assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), HELLO);
    }
}

// =============================================================================
// Message Structure
// =============================================================================

mod structure {
    use super::*;

    #[test]
    fn test_encrypt_sign_literal_shape() {
        let alice = generate_cert("Alice <alice@example.com>");
        let ciphertext = encrypt(HELLO, &recipients_of(&alice), &[], &signers_of(&alice), false)
            .unwrap();

        let policy = StandardPolicy::new();
        let helper =
            KeyringHelper::new(vec![alice.clone()], &policy, None).with_key_password(TEST_PASSWORD);
        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, helper, None).unwrap();

        assert_eq!(reader.structure().shape(), vec![2, 3]);
        assert!(reader.structure().is_encrypted());
        assert_eq!(reader.structure().good_signatures(), 1);
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
        assert!(reader.message_processed());
    }

    #[test]
    fn test_signer_is_not_the_recipient() {
        let alice = generate_cert("Alice <alice@example.com>");
        let bob = generate_cert("Bob <bob@example.com>");
        let ciphertext =
            encrypt(HELLO, &recipients_of(&bob), &[], &signers_of(&alice), false).unwrap();

        let policy = StandardPolicy::new();
        let asked = RefCell::new(Vec::new());
        let mut keyring = KeyringHelper::new(vec![bob.clone(), alice.strip_secret()], &policy, None)
            .with_key_password(TEST_PASSWORD);
        let certs = vec![bob.clone(), alice.strip_secret()];
        let callbacks = Callbacks::new(
            |ids| {
                asked.borrow_mut().extend_from_slice(ids);
                Ok(certs
                    .iter()
                    .filter(|cert| ids.iter().any(|id| cert.key_by_id(id).is_some()))
                    .cloned()
                    .collect())
            },
            |structure| {
                if structure.good_signatures() == 1 {
                    Status::Success
                } else {
                    Status::BadSignature
                }
            },
        )
        .with_session_key(|pkesks, skesks| keyring.get_session_key(pkesks, skesks));

        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, callbacks, None).unwrap();
        assert_eq!(reader.structure().shape(), vec![2, 3]);
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
        drop(reader);

        let asked = asked.into_inner();
        let alice_ids: Vec<_> = alice.keys().collect().iter().map(|k| k.keyid()).collect();
        let bob_ids: Vec<_> = bob.keys().collect().iter().map(|k| k.keyid()).collect();
        assert!(asked.iter().any(|id| alice_ids.contains(id)));
        assert!(asked.iter().any(|id| bob_ids.contains(id)));

        let helper = KeyringHelper::new(vec![bob.clone(), alice.strip_secret()], &policy, None)
            .with_key_password(TEST_PASSWORD);
        let (plaintext, structure) =
            openpgp_stack::decrypt(&ciphertext, helper, &policy, None).unwrap();
        assert_eq!(plaintext, HELLO);
        assert_eq!(structure.good_signatures(), 1);
    }

    #[test]
    fn test_compressed_shape() {
        let alice = generate_cert("Alice <alice@example.com>");

        let mut stack = WriterStack::new(Vec::new())
            .push_encrypt(&[], &recipients_of(&alice), 0)
            .unwrap()
            .push_compress(CompressionAlgorithm::ZLIB)
            .unwrap()
            .push_sign(&signers_of(&alice), None)
            .unwrap()
            .push_literal();
        stack.write_all(HELLO).unwrap();
        let ciphertext = stack.finalize().unwrap();

        let policy = StandardPolicy::new();
        let helper =
            KeyringHelper::new(vec![alice.clone()], &policy, None).with_key_password(TEST_PASSWORD);
        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, helper, None).unwrap();

        let layers = reader.structure().layers();
        assert_eq!(layers.len(), 3);
        assert!(layers[0].is_encryption());
        assert!(layers[1].is_compression());
        let group = layers[2].signature_group().unwrap();
        assert_eq!(group.len(), 1);
        assert!(group[0].is_good());
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
    }

    #[test]
    fn test_check_rejection_aborts() {
        let alice = generate_cert("Alice <alice@example.com>");
        let signed = sign(HELLO, &signers_of(&alice), false, false).unwrap();
        let public = alice.strip_secret();

        let policy = StandardPolicy::new();
        let callbacks = Callbacks::new(
            |_| Ok(vec![public.clone()]),
            |structure| {
                assert_eq!(structure.good_signatures(), 1);
                Status::BadSignature
            },
        );
        assert!(matches!(
            Verifier::from_bytes(&policy, &signed, callbacks, None),
            Err(Error::BadSignature(_))
        ));
    }

    #[test]
    fn test_check_sees_exact_layers() {
        let ciphertext = encrypt(HELLO, &[], &["p"], &[], false).unwrap();
        let policy = StandardPolicy::new();
        let seen = RefCell::new(Vec::new());

        let callbacks = Callbacks::new(
            |_| Ok(Vec::new()),
            |structure| {
                *seen.borrow_mut() = structure.shape();
                match structure.layers() {
                    [MessageLayer::Encryption { .. }] => Status::Success,
                    _ => Status::MalformedMessage,
                }
            },
        )
        .with_session_key(|_, skesks| {
            assert_eq!(skesks.len(), 1);
            Ok(openpgp_stack::ResolvedSessionKey::from_password("p"))
        });

        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, callbacks, None).unwrap();
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
        drop(reader);
        assert_eq!(*seen.borrow(), vec![2]);
    }
}

// =============================================================================
// Session Key Resolution
// =============================================================================

mod session_keys {
    use super::*;

    #[test]
    fn test_later_key_matches_after_earlier_miss() {
        let k1 = generate_cert("K1 <k1@example.com>");
        let k2 = generate_cert("K2 <k2@example.com>");
        let k2_encryption = recipients_of(&k2)[0].key().fingerprint();

        // K1 is addressed first but only its public half is in the keyring
        let mut recipients = recipients_of(&k1);
        recipients.extend(recipients_of(&k2));
        let ciphertext = encrypt(HELLO, &recipients, &[], &[], false).unwrap();

        let policy = StandardPolicy::new();
        let mut keyring = KeyringHelper::new(vec![k1.strip_secret(), k2.clone()], &policy, None)
            .with_key_password(TEST_PASSWORD);
        let order = RefCell::new(Vec::new());
        let chosen = RefCell::new(None);

        let callbacks = Callbacks::new(|_| Ok(vec![k2.clone()]), |_| Status::Success)
            .with_session_key(|pkesks, skesks| {
                *order.borrow_mut() = pkesks.iter().filter_map(|p| p.recipient()).collect();
                let resolved = keyring.get_session_key(pkesks, skesks)?;
                *chosen.borrow_mut() = resolved.fingerprint().cloned();
                Ok(resolved)
            });

        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, callbacks, None).unwrap();
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
        drop(reader);

        assert!(order.borrow().contains(&recipients_of(&k1)[0].keyid()));
        assert_eq!(chosen.into_inner(), Some(k2_encryption));
    }

    #[test]
    fn test_first_matching_key_wins() {
        let k1 = generate_cert("K1 <k1@example.com>");
        let k2 = generate_cert("K2 <k2@example.com>");
        let k1_ids: Vec<_> = k1.keys().collect().iter().map(|k| k.keyid()).collect();
        let k2_fingerprints: Vec<_> = k2.keys().collect().iter().map(|k| k.fingerprint()).collect();

        let ciphertext = encrypt(HELLO, &recipients_of(&k2), &[], &[], false).unwrap();

        let policy = StandardPolicy::new();
        let mut keyring = KeyringHelper::new(vec![k1.clone(), k2.clone()], &policy, None)
            .with_key_password(TEST_PASSWORD);
        let chosen = RefCell::new(None);
        let certs = vec![k1.clone(), k2.clone()];

        let callbacks = Callbacks::new(|_| Ok(certs.clone()), |_| Status::Success).with_session_key(
            |pkesks, skesks| {
                assert!(skesks.is_empty());
                assert!(pkesks
                    .iter()
                    .all(|p| p.recipient().map_or(true, |id| !k1_ids.contains(&id))));
                let resolved = keyring.get_session_key(pkesks, skesks)?;
                *chosen.borrow_mut() = resolved.fingerprint().cloned();
                Ok(resolved)
            },
        );

        let mut reader = Decryptor::from_bytes(&policy, &ciphertext, callbacks, None).unwrap();
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
        drop(reader);

        let fingerprint = chosen.borrow().clone().expect("a key was chosen");
        assert!(k2_fingerprints.contains(&fingerprint));
        assert_eq!(fingerprint, recipients_of(&k2)[0].key().fingerprint());
    }

    #[test]
    fn test_no_valid_decryption_key() {
        let ciphertext = encrypt(HELLO, &[], &["p"], &[], false).unwrap();
        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(Vec::new(), &policy, None);

        assert!(matches!(
            Decryptor::from_bytes(&policy, &ciphertext, helper, None),
            Err(Error::MissingSessionKey(_))
        ));
    }

    #[test]
    fn test_verifier_refuses_encrypted_input() {
        let ciphertext = encrypt(HELLO, &[], &["p"], &[], false).unwrap();
        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(Vec::new(), &policy, None);

        assert!(matches!(
            Verifier::from_bytes(&policy, &ciphertext, helper, None),
            Err(Error::InvalidOperation(_))
        ));
    }
}

// =============================================================================
// Signing Tests
// =============================================================================

mod signing {
    use super::*;

    #[test]
    fn test_sign_round_trip_two_signers() {
        let alice = generate_cert("Alice <alice@example.com>");
        let bob = generate_cert("Bob <bob@example.com>");
        let mut signers = signers_of(&alice);
        signers.extend(signers_of(&bob));

        let signed = sign(HELLO, &signers, false, true).unwrap();
        assert!(signed.starts_with(b"-----BEGIN PGP MESSAGE-----"));

        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(vec![alice.strip_secret(), bob.strip_secret()], &policy, None);
        let mut reader = Verifier::from_bytes(&policy, &signed, helper, None).unwrap();

        assert_eq!(reader.structure().shape(), vec![3]);
        let group = reader.structure().layers()[0].signature_group().unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.iter().all(|r| r.is_good()));
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
    }

    #[test]
    fn test_unknown_signer() {
        let alice = generate_cert("Alice <alice@example.com>");
        let bob = generate_cert("Bob <bob@example.com>");
        let signed = sign(HELLO, &signers_of(&alice), false, false).unwrap();

        assert!(matches!(
            verify_with_certs(&signed, &[bob.strip_secret()]),
            Err(Error::UnsupportedCert(_))
        ));
        assert_eq!(verify_with_certs(&signed, &[alice.strip_secret()]).unwrap(), HELLO);
    }

    #[test]
    fn test_unsigned_message_does_not_verify() {
        let alice = generate_cert("Alice <alice@example.com>");
        let mut stack = WriterStack::new(Vec::new()).push_literal();
        stack.write_all(HELLO).unwrap();
        let unsigned = stack.finalize().unwrap();

        assert!(matches!(
            verify_with_certs(&unsigned, &[alice.strip_secret()]),
            Err(Error::BadSignature(_))
        ));
    }

    #[test]
    fn test_prefix_signed_message() {
        let alice = generate_cert("Alice <alice@example.com>");
        let mallory = generate_cert("Mallory <mallory@example.com>");

        let mut stack = WriterStack::new(Vec::new()).push_literal();
        stack.write_all(HELLO).unwrap();
        let literal = stack.finalize().unwrap();

        let prefixed = |signer: &Cert| {
            let mut message = sign(HELLO, &signers_of(signer), true, false).unwrap();
            message.extend_from_slice(&literal);
            message
        };

        let forged = prefixed(&mallory);
        assert!(verify_with_certs(&forged, &[alice.strip_secret()]).is_err());

        let genuine = prefixed(&alice);
        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(vec![alice.strip_secret()], &policy, None);
        let mut reader = Verifier::from_bytes(&policy, &genuine, helper, None).unwrap();
        assert_eq!(reader.structure().shape(), vec![3]);
        assert_eq!(reader.structure().good_signatures(), 1);
        assert_eq!(reader.read_to_vec().unwrap(), HELLO);
    }

    #[test]
    fn test_no_certificates_found() {
        let alice = generate_cert("Alice <alice@example.com>");
        let signed = sign(HELLO, &signers_of(&alice), false, false).unwrap();

        let policy = StandardPolicy::new();
        let callbacks = Callbacks::new(|_| Ok(Vec::new()), |_| Status::Success);
        assert!(matches!(
            Verifier::from_bytes(&policy, &signed, callbacks, None),
            Err(Error::UnsupportedCert(_))
        ));
    }

    #[test]
    fn test_empty_signer_set() {
        assert!(matches!(
            WriterStack::new(Vec::new()).push_sign(&[], None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            WriterStack::new(Vec::new()).push_sign_detached(&[], None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(sign(HELLO, &[], true, false), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let alice = generate_cert("Alice <alice@example.com>").strip_secret();
        let key = alice.keys().collect().remove(0);
        assert!(matches!(Signer::new(key), Err(Error::InvalidArgument(_))));
    }
}

// =============================================================================
// Detached Signatures
// =============================================================================

mod detached {
    use super::*;

    #[test]
    fn test_detached_round_trip() {
        let alice = generate_cert("Alice <alice@example.com>");
        let certs = [alice.strip_secret()];

        let mut stack = WriterStack::new(Vec::new())
            .push_sign_detached(&signers_of(&alice), None)
            .unwrap();
        stack.write_all(HELLO).unwrap();
        let signature = stack.finalize().unwrap();

        assert_eq!(verify_detached_with_certs(HELLO, &signature, &certs), Status::Success);

        let mut tampered = HELLO.to_vec();
        tampered[0] ^= 0x01;
        let status = verify_detached_with_certs(&tampered, &signature, &certs);
        assert!(!status.is_success());
        assert!(matches!(status, Status::BadSignature | Status::ManipulatedMessage));
    }

    #[test]
    fn test_detached_armored_with_helper() {
        let alice = generate_cert("Alice <alice@example.com>");
        let signature = sign(HELLO, &signers_of(&alice), true, true).unwrap();
        assert!(signature.starts_with(b"-----BEGIN PGP SIGNATURE-----"));

        let policy = StandardPolicy::new();
        let helper = KeyringHelper::new(vec![alice.strip_secret()], &policy, None);
        let mut verifier = DetachedVerifier::from_bytes(&policy, &signature, helper, None).unwrap();
        verifier.verify(HELLO).unwrap();
        assert!(verifier.verify(&b"Hello world?"[..]).is_err());
    }

    #[test]
    fn test_detached_is_not_a_message() {
        let alice = generate_cert("Alice <alice@example.com>");
        let message = sign(HELLO, &signers_of(&alice), false, false).unwrap();

        let status = verify_detached_with_certs(HELLO, &message, &[alice.strip_secret()]);
        assert_eq!(status, Status::MalformedMessage);
    }
}

// =============================================================================
// Armor
// =============================================================================

mod armoring {
    use super::*;

    #[test]
    fn test_armor_idempotent() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        for kind in [ArmorKind::Message, ArmorKind::Signature, ArmorKind::File] {
            let armored = armor(&bytes, kind, &[]).unwrap();
            let (found, body) = dearmor(armored.as_bytes()).unwrap();
            assert_eq!(found, kind);
            assert_eq!(body, bytes);
        }
    }

    #[test]
    fn test_armor_detects_corruption() {
        let bytes = b"Hello world! This is armored.".to_vec();
        let armored = armor(&bytes, ArmorKind::Message, &[]).unwrap();

        let body_start = armored.find("\n\n").unwrap() + 2;
        let mut corrupted = armored.into_bytes();
        corrupted[body_start] = if corrupted[body_start] == b'A' { b'B' } else { b'A' };

        match dearmor(&corrupted) {
            Err(_) => {}
            Ok((_, body)) => assert_ne!(body, bytes),
        }
    }
}

// =============================================================================
// Files
// =============================================================================

mod files {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_file() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let encrypted = dir.path().join("plain.txt.asc");
        let decrypted = dir.path().join("plain.out");
        std::fs::write(&plain, HELLO).unwrap();

        let alice = generate_cert("Alice <alice@example.com>");
        encrypt_file_for(&plain, &[alice.strip_secret()], &StandardPolicy::new(), &encrypted)
            .unwrap();

        let armored = std::fs::read(&encrypted).unwrap();
        assert!(armored.starts_with(b"-----BEGIN PGP ARMORED FILE-----"));

        assert_eq!(decrypt_file_for(&encrypted, &alice, TEST_PASSWORD, None).unwrap(), HELLO);
        let returned = decrypt_file_for(&encrypted, &alice, TEST_PASSWORD, Some(decrypted.as_path())).unwrap();
        assert!(returned.is_empty());
        assert_eq!(std::fs::read(&decrypted).unwrap(), HELLO);
    }

    #[test]
    fn test_decrypt_requires_secret_keys() {
        let alice = generate_cert("Alice <alice@example.com>");
        let ciphertext = encrypt(HELLO, &recipients_of(&alice), &[], &[], false).unwrap();
        assert!(matches!(
            decrypt_for(&ciphertext, &alice.strip_secret(), TEST_PASSWORD),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sign_and_verify_detached_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("manifesto.txt");
        let signature = dir.path().join("manifesto.txt.sig");
        std::fs::write(&data, b"A cypherpunk's manifesto").unwrap();

        let alice = generate_cert("Alice <alice@example.com>");
        sign_file(&data, &signers_of(&alice), true, &signature).unwrap();

        let certs = [alice.strip_secret()];
        assert_eq!(verify_detached_file(&data, &signature, &certs).unwrap(), Status::Success);

        std::fs::write(&data, b"A cypherpunk's manifestO").unwrap();
        assert!(!verify_detached_file(&data, &signature, &certs).unwrap().is_success());
    }
}

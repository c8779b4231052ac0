use super::*;
use kestrel_api::{Error, StreamCipher, SymmetricKey};

const ALL_VARIANTS: [StreamCipherVariant; 6] = [
    StreamCipherVariant::Tsx256,
    StreamCipherVariant::Tsx512,
    StreamCipherVariant::Tsx1024,
    StreamCipherVariant::Csx256,
    StreamCipherVariant::Csx512,
    StreamCipherVariant::Rcs,
];

fn key_for(variant: StreamCipherVariant, fill: u8) -> SymmetricKey {
    let size = variant.legal_key_sizes()[0];
    SymmetricKey::with_nonce(&vec![fill; size.key_size], &vec![fill ^ 0x55; size.nonce_size])
}

#[test]
fn test_round_trip_every_variant_and_mac() {
    let macs = [
        StreamAuthenticator::HmacSha256,
        StreamAuthenticator::HmacSha512,
        StreamAuthenticator::Kmac256,
        StreamAuthenticator::Kmac512,
        StreamAuthenticator::Kmac1024,
        StreamAuthenticator::Poly1305,
        StreamAuthenticator::Gmac,
    ];

    for variant in ALL_VARIANTS {
        for mac in macs {
            let key = key_for(variant, 0xa5);
            let plaintext = vec![0x42u8; 333];

            let mut enc = CipherStream::new(variant, Some(mac));
            enc.initialize(true, &key).unwrap();
            enc.set_associated_data(b"header").unwrap();
            let sealed = enc.encrypt_to_vec(&plaintext).unwrap();
            assert_eq!(sealed.len(), plaintext.len() + mac.tag_size());

            let mut dec = CipherStream::new(variant, Some(mac));
            dec.initialize(false, &key).unwrap();
            dec.set_associated_data(b"header").unwrap();
            let opened = dec.decrypt_to_vec(&sealed).unwrap();
            assert_eq!(opened, plaintext, "{} {}", variant.as_str(), mac.as_str());
        }
    }
}

#[test]
fn test_unauthenticated_round_trip() {
    for variant in ALL_VARIANTS {
        let key = key_for(variant, 0x01);
        let plaintext = vec![0x99u8; 257];

        let mut enc = CipherStream::new(variant, None);
        enc.initialize(true, &key).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        enc.transform(&plaintext, &mut ciphertext).unwrap();
        assert_ne!(ciphertext, plaintext);

        let mut dec = CipherStream::new(variant, None);
        dec.initialize(false, &key).unwrap();
        let mut recovered = vec![0u8; ciphertext.len()];
        dec.transform(&ciphertext, &mut recovered).unwrap();
        assert_eq!(recovered, plaintext, "{}", variant.as_str());
    }
}

#[test]
fn test_deterministic_reinitialization() {
    let key = key_for(StreamCipherVariant::Tsx512, 0x3c);
    let message = vec![7u8; 500];

    let mut cipher = CipherStream::new(StreamCipherVariant::Tsx512, None);
    cipher.initialize(true, &key).unwrap();
    let mut first = vec![0u8; 500];
    cipher.transform(&message, &mut first).unwrap();

    cipher.reset();
    cipher.initialize(true, &key).unwrap();
    let mut second = vec![0u8; 500];
    cipher.transform(&message, &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_simd_profiles_agree() {
    for variant in ALL_VARIANTS {
        let key = key_for(variant, 0x77);
        // enough for the eight-lane path plus a ragged tail
        let len = variant.block_size() * 23 + 5;
        let plaintext = vec![0u8; len];
        let mut outputs = Vec::new();

        for profile in [SimdProfile::Scalar, SimdProfile::Lanes4, SimdProfile::Lanes8] {
            let mut cipher = CipherStream::new(variant, None);
            cipher.set_simd_profile(profile);
            cipher.initialize(true, &key).unwrap();
            let mut out = vec![0u8; len];
            cipher.transform(&plaintext, &mut out).unwrap();
            outputs.push(out);
        }

        assert_eq!(outputs[0], outputs[1], "{}", variant.as_str());
        assert_eq!(outputs[0], outputs[2], "{}", variant.as_str());
    }
}

#[test]
fn test_parallel_degrees_agree() {
    for variant in [StreamCipherVariant::Rcs, StreamCipherVariant::Csx256] {
        let key = key_for(variant, 0xff);
        let plaintext: Vec<u8> = (0..65_536u32).map(|i| i as u8).collect();
        let mut reference = None;

        for degree in [1usize, 2, 4, 8] {
            let mut cipher = CipherStream::new(variant, None);
            cipher.set_parallel_max_degree(degree).unwrap();
            cipher.initialize(true, &key).unwrap();
            let mut out = vec![0u8; plaintext.len()];
            cipher.transform(&plaintext, &mut out).unwrap();

            match &reference {
                None => reference = Some(out),
                Some(expected) => assert_eq!(expected, &out, "degree {}", degree),
            }
        }
    }
}

#[test]
fn test_parallel_and_sequential_counter_agree_across_calls() {
    // the master counter must land in the same place whichever path ran
    let variant = StreamCipherVariant::Csx512;
    let key = key_for(variant, 0x20);
    let big: Vec<u8> = (0..131_072u32).map(|i| (i * 7) as u8).collect();

    let mut seq = CipherStream::new(variant, None);
    seq.set_parallel(false);
    seq.initialize(true, &key).unwrap();
    let mut seq_out = vec![0u8; big.len()];
    seq.transform(&big[..100_000], &mut seq_out[..100_000]).unwrap();
    seq.transform(&big[100_000..], &mut seq_out[100_000..]).unwrap();

    let mut par = CipherStream::new(variant, None);
    par.set_parallel_max_degree(4).unwrap();
    par.initialize(true, &key).unwrap();
    let mut par_out = vec![0u8; big.len()];
    par.transform(&big[..100_000], &mut par_out[..100_000]).unwrap();
    par.transform(&big[100_000..], &mut par_out[100_000..]).unwrap();

    assert_eq!(seq_out, par_out);
}

#[test]
fn test_info_acts_as_tweak() {
    for variant in ALL_VARIANTS {
        let size = variant.legal_key_sizes()[0];
        let key_bytes = vec![1u8; size.key_size];
        let nonce = vec![2u8; size.nonce_size];

        let plain = vec![0u8; 64];
        let mut with_default = vec![0u8; 64];
        let mut with_info = vec![0u8; 64];

        let mut cipher = CipherStream::new(variant, None);
        cipher
            .initialize(true, &SymmetricKey::with_nonce(&key_bytes, &nonce))
            .unwrap();
        cipher.transform(&plain, &mut with_default).unwrap();

        let mut cipher = CipherStream::new(variant, None);
        cipher
            .initialize(
                true,
                &SymmetricKey::with_info(&key_bytes, &nonce, &[9u8; 16]),
            )
            .unwrap();
        cipher.transform(&plain, &mut with_info).unwrap();

        assert_ne!(with_default, with_info, "{}", variant.as_str());
    }
}

#[test]
fn test_partial_info_rejected() {
    let size = StreamCipherVariant::Tsx256.legal_key_sizes()[0];
    let mut cipher = CipherStream::new(StreamCipherVariant::Tsx256, None);
    let key = SymmetricKey::with_info(&vec![0; size.key_size], &vec![0; size.nonce_size], &[1; 7]);
    assert!(matches!(
        cipher.initialize(true, &key),
        Err(Error::InvalidInfo { .. })
    ));
}

#[test]
fn test_key_and_nonce_validation() {
    let mut cipher = CipherStream::new(StreamCipherVariant::Tsx512, None);

    assert!(matches!(
        cipher.initialize(true, &SymmetricKey::with_nonce(&[0; 63], &[0; 16])),
        Err(Error::InvalidKey { .. })
    ));
    assert!(matches!(
        cipher.initialize(true, &SymmetricKey::with_nonce(&[0; 64], &[0; 12])),
        Err(Error::InvalidNonce { .. })
    ));
}

#[test]
fn test_state_machine_guards() {
    let variant = StreamCipherVariant::Csx256;
    let key = key_for(variant, 0x10);

    // operations before initialize
    let mut cipher = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    let mut buf = [0u8; 16];
    assert!(matches!(
        cipher.transform(&[0; 16], &mut buf),
        Err(Error::NotInitialized { .. })
    ));
    assert!(matches!(
        cipher.set_associated_data(b"x"),
        Err(Error::NotInitialized { .. })
    ));

    // aad after transform
    cipher.initialize(true, &key).unwrap();
    cipher.transform(&[0; 16], &mut buf).unwrap();
    assert!(matches!(
        cipher.set_associated_data(b"late"),
        Err(Error::IllegalOperation { .. })
    ));

    // only one aad absorb per cycle
    let mut cipher = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    cipher.initialize(true, &key).unwrap();
    cipher.set_associated_data(b"one").unwrap();
    assert!(matches!(
        cipher.set_associated_data(b"two"),
        Err(Error::IllegalOperation { .. })
    ));

    // finalize without an authenticator
    let mut plain = CipherStream::new(variant, None);
    plain.initialize(true, &key).unwrap();
    let mut tag = [0u8; 32];
    assert!(matches!(
        plain.finalize(&mut tag),
        Err(Error::IllegalOperation { .. })
    ));
}

#[test]
fn test_verify_failure_poisons_instance() {
    let variant = StreamCipherVariant::Tsx256;
    let key = key_for(variant, 0x61);

    let mut enc = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    enc.initialize(true, &key).unwrap();
    let mut sealed = enc.encrypt_to_vec(&[5u8; 100]).unwrap();

    // corrupt the tag
    let last = sealed.len() - 1;
    sealed[last] ^= 0x01;

    let mut dec = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    dec.initialize(false, &key).unwrap();
    assert!(matches!(
        dec.decrypt_to_vec(&sealed),
        Err(Error::AuthenticationFailure { .. })
    ));

    // poisoned: no further plaintext
    let mut buf = [0u8; 4];
    assert!(matches!(
        dec.transform(&[0; 4], &mut buf),
        Err(Error::IllegalOperation { .. })
    ));
}

#[test]
fn test_streaming_verify_path() {
    let variant = StreamCipherVariant::Csx512;
    let key = key_for(variant, 0x44);
    let plaintext = vec![0xabu8; 777];

    let mut enc = CipherStream::new(variant, Some(StreamAuthenticator::HmacSha512));
    enc.initialize(true, &key).unwrap();
    let mut ciphertext = vec![0u8; plaintext.len()];
    enc.transform(&plaintext, &mut ciphertext).unwrap();
    let mut tag = vec![0u8; enc.tag_size()];
    enc.finalize(&mut tag).unwrap();

    let mut dec = CipherStream::new(variant, Some(StreamAuthenticator::HmacSha512));
    dec.initialize(false, &key).unwrap();
    let mut recovered = vec![0u8; ciphertext.len()];
    dec.transform(&ciphertext, &mut recovered).unwrap();
    assert!(dec.verify(&tag).unwrap());
    assert_eq!(recovered, plaintext);
}

#[test]
fn test_rekey_monotonicity() {
    // two finalizations must run under different MAC keys: the same
    // message re-encrypted in the next cycle gets a different tag
    let variant = StreamCipherVariant::Tsx512;
    let key = key_for(variant, 0x88);

    let mut cipher = CipherStream::new(variant, Some(StreamAuthenticator::Kmac512));
    cipher.initialize(true, &key).unwrap();

    let mut ct1 = vec![0u8; 64];
    cipher.transform(&[0u8; 64], &mut ct1).unwrap();
    let mut tag1 = vec![0u8; cipher.tag_size()];
    cipher.finalize(&mut tag1).unwrap();

    let mut ct2 = vec![0u8; 64];
    cipher.transform(&[0u8; 64], &mut ct2).unwrap();
    let mut tag2 = vec![0u8; cipher.tag_size()];
    cipher.finalize(&mut tag2).unwrap();

    assert_ne!(tag1, tag2);
    // ciphertexts also differ: the counter kept advancing
    assert_ne!(ct1, ct2);
}

#[test]
fn test_authenticated_keystream_differs_from_plain() {
    // cSHAKE key expansion must separate the two cases
    let variant = StreamCipherVariant::Tsx256;
    let key = key_for(variant, 0x13);

    let mut plain = CipherStream::new(variant, None);
    plain.initialize(true, &key).unwrap();
    let mut a = vec![0u8; 64];
    plain.transform(&[0u8; 64], &mut a).unwrap();

    let mut authed = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    authed.initialize(true, &key).unwrap();
    let mut b = vec![0u8; 64];
    authed.transform(&[0u8; 64], &mut b).unwrap();

    assert_ne!(a, b);
}

#[test]
fn test_empty_message_still_tags() {
    let variant = StreamCipherVariant::Rcs;
    let key = key_for(variant, 0x29);

    let mut enc = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    enc.initialize(true, &key).unwrap();
    let sealed = enc.encrypt_to_vec(&[]).unwrap();
    assert_eq!(sealed.len(), 32);

    let mut dec = CipherStream::new(variant, Some(StreamAuthenticator::Kmac256));
    dec.initialize(false, &key).unwrap();
    let opened = dec.decrypt_to_vec(&sealed).unwrap();
    assert!(opened.is_empty());
}

#[test]
fn test_block_boundary_lengths() {
    for variant in ALL_VARIANTS {
        let block = variant.block_size();
        let key = key_for(variant, 0x52);

        for len in [0usize, 1, block - 1, block, block + 1, 8 * block, 8 * block + 3] {
            let plaintext = vec![0x5au8; len];

            let mut enc = CipherStream::new(variant, Some(StreamAuthenticator::Poly1305));
            enc.initialize(true, &key).unwrap();
            let sealed = enc.encrypt_to_vec(&plaintext).unwrap();

            let mut dec = CipherStream::new(variant, Some(StreamAuthenticator::Poly1305));
            dec.initialize(false, &key).unwrap();
            let opened = dec.decrypt_to_vec(&sealed).unwrap();
            assert_eq!(opened, plaintext, "{} len {}", variant.as_str(), len);
        }
    }
}

#[test]
fn test_parallel_degree_validation() {
    let mut cipher = CipherStream::new(StreamCipherVariant::Rcs, None);
    assert!(matches!(
        cipher.set_parallel_max_degree(0),
        Err(Error::InvalidParam { .. })
    ));
    assert!(matches!(
        cipher.set_parallel_max_degree(3),
        Err(Error::InvalidParam { .. })
    ));
    assert!(cipher.set_parallel_max_degree(1).is_ok());
    assert!(cipher.set_parallel_max_degree(2).is_ok());
}

#[test]
fn test_names() {
    let plain = CipherStream::new(StreamCipherVariant::Tsx1024, None);
    assert_eq!(plain.name(), "TSX1024");

    let authed = CipherStream::new(
        StreamCipherVariant::Csx512,
        Some(StreamAuthenticator::Kmac512),
    );
    assert_eq!(authed.name(), "CSX512-KMAC512");
    assert_eq!(authed.tag_size(), 64);
}

use super::*;
use kestrel_api::MacEngine;

#[test]
fn test_rfc8439_vector() {
    let key = hex::decode("85d6be7857556d337f4452fe42d506a80103808afb0db2fd4abff6af4149f51b")
        .unwrap();
    let msg = b"Cryptographic Forum Research Group";

    let mut tag = [0u8; 16];
    Poly1305::mac_into(&key, msg, &mut tag).unwrap();
    assert_eq!(hex::encode(tag), "a8061dc1305136c6c22b8baf0c0127a9");
}

#[test]
fn test_nacl_vector() {
    // the original NaCl onetimeauth test
    let key = hex::decode("eea6a7251c1e72916d11c2cb214d3c252539121d8e234e652d651fa4c8cff880")
        .unwrap();
    let msg = hex::decode(
        "8e993b9f48681273c29650ba32fc76ce48332ea7164d96a4476fb8c531a1186a\
         c0dfc17c98dce87b4da7f011ec48c97271d2c20f9b928fe2270d6fb863d51738\
         b48eeee314a7cc8ab932164548e526ae90224368517acfeabd6bb3732bc0e9da\
         99832b61ca01b6de56244a9e88d5f9b37973f622a43d14a6599b1f654cb45a74\
         e355a5",
    )
    .unwrap();

    let mut tag = [0u8; 16];
    Poly1305::mac_into(&key, &msg, &mut tag).unwrap();
    assert_eq!(hex::encode(tag), "f3ffc7703f9400e52a7dfb4b3d3305d9");
}

#[test]
fn test_partial_block_padding() {
    // 63 bytes exercises the 0x01-padded final block
    let key = [0x01u8; 32];
    let msg = [0u8; 63];

    let mut a = [0u8; 16];
    Poly1305::mac_into(&key, &msg, &mut a).unwrap();

    // the same bytes split unevenly must agree
    let mut mac = Poly1305::new(&key).unwrap();
    mac.update(&msg[..7]).unwrap();
    mac.update(&msg[7..40]).unwrap();
    mac.update(&msg[40..]).unwrap();
    let mut b = [0u8; 16];
    mac.finalize_into(&mut b).unwrap();

    assert_eq!(a, b);

    // and differ from the zero-padded full block
    let mut c = [0u8; 16];
    Poly1305::mac_into(&key, &[0u8; 64], &mut c).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_key_policy_and_state_machine() {
    assert!(Poly1305::new(&[0u8; 31]).is_err());

    let mut mac = Poly1305::new(&[2u8; 32]).unwrap();
    mac.update(b"once").unwrap();
    let mut tag = [0u8; 16];
    mac.finalize_into(&mut tag).unwrap();

    assert!(!mac.is_initialized());
    assert!(mac.update(b"again").is_err());

    mac.rekey(&[3u8; 32]).unwrap();
    assert!(mac.is_initialized());
}

#[test]
fn test_empty_message() {
    let mut tag = [0u8; 16];
    Poly1305::mac_into(&[9u8; 32], b"", &mut tag).unwrap();
    // empty message: tag = s (h stays zero)
    assert_eq!(&tag[..4], &[9, 9, 9, 9]);
}

//! Calldata encoding vectors
//!
//! The mint vectors are the outputs recorded for the three token wallets;
//! the constructor case checks the head/tail layout byte by byte.

use calldata_abi::{
    decode, encode, encode_constructor, function_selector, parse_args, units::parse_ether, AbiError,
    Address, ParamType, ParseOptions, Signature, Token, U256,
};

const MINT: &str = "mint(address,uint256)";

fn mint_calldata(wallet: &str) -> String {
    let sig = Signature::parse(MINT).unwrap();
    let args = parse_args(&sig, &[wallet, "2000000000 ether"], &ParseOptions::default()).unwrap();
    encode(&sig, &args).unwrap().to_hex()
}

// ==================== Known vectors ====================

#[test]
fn test_mint_token_wallet_1() {
    assert_eq!(
        mint_calldata("0x4E9Ff90564C9D6B89d63197A0034c09A50e53190"),
        "0x40c10f190000000000000000000000004e9ff90564c9d6b89d63197a0034c09a50e53190000000000000000000000000000000000000000006765c793fa10079d0000000"
    );
}

#[test]
fn test_mint_token_wallet_2() {
    assert_eq!(
        mint_calldata("0x08D8B7852a03e775BE9C0D2137A59E417A4B3e5B"),
        "0x40c10f1900000000000000000000000008d8b7852a03e775be9c0d2137a59e417a4b3e5b000000000000000000000000000000000000000006765c793fa10079d0000000"
    );
}

#[test]
fn test_mint_token_wallet_3() {
    assert_eq!(
        mint_calldata("0x062f6869e5FC2f56f52a817eAd98c1d6576412F4"),
        "0x40c10f19000000000000000000000000062f6869e5fc2f56f52a817ead98c1d6576412f4000000000000000000000000000000000000000006765c793fa10079d0000000"
    );
}

#[test]
fn test_mint_from_typed_tokens() {
    let sig = Signature::parse(MINT).unwrap();
    let wallet = Address::from_hex("0x4E9Ff90564C9D6B89d63197A0034c09A50e53190").unwrap();
    let amount = U256::from(2_000_000_000u64) * U256::exp10(18);
    assert_eq!(amount, parse_ether("2000000000").unwrap());

    let typed = encode(&sig, &[Token::Address(wallet), Token::Uint(amount)]).unwrap();
    assert_eq!(typed.to_hex(), mint_calldata("0x4E9Ff90564C9D6B89d63197A0034c09A50e53190"));
}

// ==================== Selector ====================

#[test]
fn test_selector_prefixes_every_call() {
    for text in [MINT, "transfer(address,uint256)", "initialize(address,address[3])", "f(bytes,string[])"] {
        let sig = Signature::parse(text).unwrap();
        let types = sig.types();
        let tokens: Vec<Token> = types.iter().map(zero_token).collect();
        let data = encode(&sig, &tokens).unwrap();
        assert_eq!(&data.as_bytes()[..4], &function_selector(text), "{text}");
    }
}

fn zero_token(kind: &ParamType) -> Token {
    match kind {
        ParamType::Address => Token::Address(Address::ZERO),
        ParamType::Uint(_) => Token::Uint(U256::zero()),
        ParamType::Bytes => Token::Bytes(vec![]),
        ParamType::Array(_) => Token::Array(vec![]),
        ParamType::FixedArray(inner, n) => Token::FixedArray((0..*n).map(|_| zero_token(inner)).collect()),
        other => panic!("no zero token for {}", other),
    }
}

// ==================== Fixed array ====================

#[test]
fn test_address_array_is_three_words() {
    let sig = Signature::parse("initialize(address[3])").unwrap();
    let wallets = [
        "0x4E9Ff90564C9D6B89d63197A0034c09A50e53190",
        "0x08D8B7852a03e775BE9C0D2137A59E417A4B3e5B",
        "0x062f6869e5FC2f56f52a817eAd98c1d6576412F4",
    ];
    let arg = format!("[{}]", wallets.join(","));
    let tokens = parse_args(&sig, &[arg], &ParseOptions::default()).unwrap();
    let data = encode(&sig, &tokens).unwrap();
    let body = &data.as_bytes()[4..];

    assert_eq!(body.len(), 96);
    for (i, wallet) in wallets.iter().enumerate() {
        let word = &body[i * 32..(i + 1) * 32];
        assert!(word[..12].iter().all(|b| *b == 0));
        assert_eq!(&word[12..], Address::from_hex(wallet).unwrap().as_bytes());
    }
}

// ==================== Failures ====================

#[test]
fn test_short_address_produces_no_output() {
    let sig = Signature::parse(MINT).unwrap();
    let result = parse_args(
        &sig,
        &["0x4E9Ff90564C9D6B89d63197A0034c09A50e531", "1"],
        &ParseOptions::default(),
    );
    assert!(matches!(result, Err(AbiError::InvalidAddress(_))));
}

#[test]
fn test_arity_mismatch() {
    let sig = Signature::parse(MINT).unwrap();
    let err = encode(&sig, &[Token::Address(Address::ZERO)]).unwrap_err();
    assert_eq!(err, AbiError::ArityMismatch { expected: 2, got: 1 });
}

// ==================== Constructor tail ====================

#[test]
fn test_proxy_constructor_layout() {
    let sig = Signature::parse("constructor(address,address,bytes)").unwrap();
    let logic = Address::from_hex("0x00000000000000000000000000000000000000aa").unwrap();
    let owner = Address::from_hex("0x00000000000000000000000000000000000000bb").unwrap();
    let payload: Vec<u8> = (1..=40).collect();

    let data = encode(
        &sig,
        &[Token::Address(logic), Token::Address(owner), Token::Bytes(payload.clone())],
    )
    .unwrap();
    let bytes = data.as_bytes();

    // head (3 words) + length word + payload padded to 64
    assert_eq!(bytes.len(), 96 + 32 + 64);
    assert_eq!(bytes[31], 0xaa);
    assert_eq!(bytes[63], 0xbb);
    assert_eq!(U256::from_big_endian(&bytes[64..96]), U256::from(96));
    assert_eq!(U256::from_big_endian(&bytes[96..128]), U256::from(40));
    assert_eq!(&bytes[128..168], &payload[..]);
    assert!(bytes[168..].iter().all(|b| *b == 0));

    assert_eq!(encode_constructor(&[], &sig, &decode(&sig, bytes).unwrap()).unwrap(), data);
}

#[test]
fn test_proxy_constructor_wraps_initialize_call() {
    let init = Signature::parse("initialize(address)").unwrap();
    let owner = Address::from_hex("0x08D8B7852a03e775BE9C0D2137A59E417A4B3e5B").unwrap();
    let init_data = encode(&init, &[Token::Address(owner)]).unwrap();
    assert_eq!(init_data.len(), 36);

    let ctor = Signature::parse("constructor(address logic, address admin, bytes data)").unwrap();
    let data = encode(
        &ctor,
        &[
            Token::Address(Address::ZERO),
            Token::Address(owner),
            Token::Bytes(init_data.as_bytes().to_vec()),
        ],
    )
    .unwrap();

    // 36-byte payload pads to 64
    assert_eq!(data.len(), 96 + 32 + 64);
    match &decode(&ctor, data.as_bytes()).unwrap()[2] {
        Token::Bytes(inner) => assert_eq!(inner.as_slice(), init_data.as_bytes()),
        other => panic!("Expected Bytes, got {:?}", other),
    }
}

//! Property tests: decode inverts encode, and encoding is deterministic

use calldata_abi::{decode, encode, Address, I256, Signature, Token, U256};
use proptest::prelude::*;

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

fn arb_u256() -> impl Strategy<Value = U256> {
    any::<[u8; 32]>().prop_map(|b| U256::from_big_endian(&b))
}

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..100)
}

proptest! {
    #[test]
    fn mint_roundtrip(to in arb_address(), amount in arb_u256()) {
        let sig = Signature::parse("mint(address,uint256)").unwrap();
        let tokens = vec![Token::Address(to), Token::Uint(amount)];
        let data = encode(&sig, &tokens).unwrap();
        prop_assert_eq!(data.len(), 68);
        prop_assert_eq!(decode(&sig, data.as_bytes()).unwrap(), tokens);
    }

    #[test]
    fn constructor_roundtrip(a in arb_address(), b in arb_address(), payload in arb_bytes()) {
        let sig = Signature::parse("constructor(address,address,bytes)").unwrap();
        let tokens = vec![Token::Address(a), Token::Address(b), Token::Bytes(payload.clone())];
        let data = encode(&sig, &tokens).unwrap();
        prop_assert_eq!(data.len() % 32, 0);
        prop_assert_eq!(data.len(), 128 + payload.len().div_ceil(32) * 32);
        prop_assert_eq!(decode(&sig, data.as_bytes()).unwrap(), tokens);
    }

    #[test]
    fn fixed_array_roundtrip(owner in arb_address(), wallets in proptest::array::uniform3(arb_address())) {
        let sig = Signature::parse("initialize(address,address[3])").unwrap();
        let tokens = vec![
            Token::Address(owner),
            Token::FixedArray(wallets.iter().copied().map(Token::Address).collect()),
        ];
        let data = encode(&sig, &tokens).unwrap();
        prop_assert_eq!(data.len(), 4 + 4 * 32);
        prop_assert_eq!(decode(&sig, data.as_bytes()).unwrap(), tokens);
    }

    #[test]
    fn nested_dynamic_roundtrip(
        items in proptest::collection::vec((any::<i64>(), ".{0,40}", arb_bytes()), 0..5),
        flag in any::<bool>(),
    ) {
        let sig = Signature::parse("f((int64,string,bytes)[],bool)").unwrap();
        let tokens = vec![
            Token::Array(
                items
                    .iter()
                    .map(|(n, s, b)| Token::Tuple(vec![
                        Token::Int(I256::from_i128(*n as i128)),
                        Token::String(s.clone()),
                        Token::Bytes(b.clone()),
                    ]))
                    .collect(),
            ),
            Token::Bool(flag),
        ];
        let data = encode(&sig, &tokens).unwrap();
        prop_assert_eq!(decode(&sig, data.as_bytes()).unwrap(), tokens);
    }

    #[test]
    fn encoding_is_deterministic(to in arb_address(), amount in arb_u256(), payload in arb_bytes()) {
        let sig = Signature::parse("g(address,uint256,bytes)").unwrap();
        let tokens = vec![Token::Address(to), Token::Uint(amount), Token::Bytes(payload)];
        prop_assert_eq!(encode(&sig, &tokens).unwrap(), encode(&sig, &tokens).unwrap());
    }

    #[test]
    fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        for text in ["mint(address,uint256)", "f(bytes,string[])", "(address,address,bytes)", "g((uint8,bytes)[],int16)"] {
            let sig = Signature::parse(text).unwrap();
            let _ = decode(&sig, &data);
        }
    }
}

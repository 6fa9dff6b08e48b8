/// Creates `$count` keypairs and as many encryptions of random 32-bit plaintexts, each under the
/// corresponding keypair.
#[macro_export]
macro_rules! setup_encryptions {
    ($rng: ident, $count: expr, $keypairs: ident, $plaintexts: ident, $encryptions: ident) => {
        let $keypairs = (0..$count)
            .map(|_| babyjub_elgamal::KeyPair::generate(&mut $rng))
            .collect::<Vec<_>>();
        let $plaintexts = (0..$count)
            .map(|_| u32::rand(&mut $rng))
            .collect::<Vec<_>>();
        let $encryptions = $keypairs
            .iter()
            .zip($plaintexts.iter())
            .map(|(kp, m)| {
                babyjub_elgamal::encrypt(
                    &mut $rng,
                    &kp.public_key,
                    Some(&babyjub_elgamal::elgamal::encode_u32(*m)),
                    None,
                )
                .unwrap()
            })
            .collect::<Vec<_>>();
    };
}

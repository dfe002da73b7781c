// Tests focusing on the key encapsulation session lifecycle
use pqc_engine::{Error, KeyEncapsulation, Result, registry};

const ML_KEM_SETS: [&str; 3] = ["ML-KEM-512", "ML-KEM-768", "ML-KEM-1024"];

// Drive a full generate/encapsulate/decapsulate round trip on one algorithm
fn round_trip(alg: &str) -> Result<()> {
    let mut receiver = KeyEncapsulation::new();
    receiver.init(alg, None)?;
    let public_key = receiver.generate_keypair()?;

    let details = receiver.details()?;
    assert_eq!(public_key.len(), details.length_public_key);
    assert_eq!(receiver.export_secret_key().len(), details.length_secret_key);

    let mut sender = KeyEncapsulation::new();
    sender.init(alg, None)?;
    let (ciphertext, shared_secret) = sender.encap_secret(&public_key)?;
    assert_eq!(ciphertext.len(), details.length_ciphertext);
    assert_eq!(shared_secret.len(), details.length_shared_secret);

    let recovered = receiver.decap_secret(&ciphertext)?;
    assert_eq!(recovered, shared_secret, "shared secret mismatch for {}", alg);

    receiver.clean();
    sender.clean();
    Ok(())
}

#[test]
fn test_round_trip_ml_kem() -> Result<()> {
    for alg in ML_KEM_SETS {
        if registry::is_kem_enabled(alg) {
            round_trip(alg)?;
        }
    }
    Ok(())
}

#[test]
fn test_round_trip_all_enabled() -> Result<()> {
    for alg in registry::enabled_kems() {
        // Classic-McEliece key generation is too slow for the default suite
        if alg.starts_with("Classic-McEliece") {
            continue;
        }
        round_trip(alg)?;
    }
    Ok(())
}

#[test]
fn test_details_consistent_for_all_enabled() -> Result<()> {
    for alg in registry::enabled_kems() {
        let mut session = KeyEncapsulation::new();
        session.init(alg, None)?;

        let details = session.details()?;
        assert_eq!(details.name, alg);
        assert!(details.length_public_key > 0);
        assert!(details.length_secret_key > 0);
        assert!(details.length_ciphertext > 0);
        assert!(details.length_shared_secret > 0);
    }
    Ok(())
}

#[test]
fn test_public_key_length_validation() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    let mut session = KeyEncapsulation::new();
    session.init(alg, None)?;
    let public_key = session.generate_keypair()?;
    let expected = session.details()?.length_public_key;

    // One byte short
    assert_eq!(
        session.encap_secret(&public_key[..public_key.len() - 1]).err(),
        Some(Error::InvalidPublicKeyLength { expected, actual: expected - 1 })
    );

    // One byte long
    let mut long = public_key.clone();
    long.push(0);
    assert_eq!(
        session.encap_secret(&long).err(),
        Some(Error::InvalidPublicKeyLength { expected, actual: expected + 1 })
    );

    Ok(())
}

#[test]
fn test_ciphertext_length_validation() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    let mut session = KeyEncapsulation::new();
    session.init(alg, None)?;
    let public_key = session.generate_keypair()?;
    let (ciphertext, _) = session.encap_secret(&public_key)?;
    let expected = session.details()?.length_ciphertext;

    assert_eq!(
        session.decap_secret(&ciphertext[..ciphertext.len() - 1]).err(),
        Some(Error::InvalidCiphertextLength { expected, actual: expected - 1 })
    );

    Ok(())
}

#[test]
fn test_decapsulation_requires_secret_key() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    // A keyed session produces the ciphertext
    let mut keyed = KeyEncapsulation::new();
    keyed.init(alg, None)?;
    let public_key = keyed.generate_keypair()?;
    let (ciphertext, _) = keyed.encap_secret(&public_key)?;

    // A keyless session must refuse to decapsulate it
    let mut keyless = KeyEncapsulation::new();
    keyless.init(alg, None)?;
    assert_eq!(
        keyless.decap_secret(&ciphertext).err(),
        Some(Error::MissingOrInvalidSecretKey)
    );

    Ok(())
}

#[test]
fn test_secret_key_supplied_at_init() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    // Generate a key pair in one session, hand the secret key to another
    let mut original = KeyEncapsulation::new();
    original.init(alg, None)?;
    let public_key = original.generate_keypair()?;
    let exported = original.export_secret_key().to_vec();

    let mut imported = KeyEncapsulation::new();
    imported.init(alg, Some(&exported))?;

    let (ciphertext, shared_secret) = original.encap_secret(&public_key)?;
    assert_eq!(imported.decap_secret(&ciphertext)?, shared_secret);

    Ok(())
}

#[test]
fn test_clean_wipes_and_allows_reinit() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    let mut session = KeyEncapsulation::new();
    session.init(alg, None)?;
    session.generate_keypair()?;
    assert!(!session.export_secret_key().is_empty());

    session.clean();
    assert!(session.export_secret_key().is_empty());
    assert_eq!(session.details().err(), Some(Error::Uninitialized));

    // Cleaning twice in succession must not fail
    session.clean();

    // A cleaned session is reusable
    session.init(alg, None)?;
    let public_key = session.generate_keypair()?;
    let (ciphertext, shared_secret) = session.encap_secret(&public_key)?;
    assert_eq!(session.decap_secret(&ciphertext)?, shared_secret);

    Ok(())
}

#[test]
fn test_disabled_algorithm_rejected() {
    // A supported-but-disabled identifier, when this build has one
    if let Some(identity) = registry::kem_identities().iter().find(|a| !a.enabled) {
        let mut session = KeyEncapsulation::new();
        assert_eq!(
            session.init(&identity.name, None).err(),
            Some(Error::AlgorithmNotEnabled(identity.name.clone()))
        );
    }

    let mut session = KeyEncapsulation::new();
    assert_eq!(
        session.init("not-a-kem", None).err(),
        Some(Error::AlgorithmNotSupported("not-a-kem".to_string()))
    );
}

#[test]
fn test_independent_sessions_across_threads() -> Result<()> {
    let Some(alg) = registry::enabled_kems().first().copied() else {
        return Ok(());
    };

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || round_trip(alg)))
        .collect();

    for handle in handles {
        handle.join().expect("session thread panicked")?;
    }
    Ok(())
}
